//! Integration test common infrastructure.
//!
//! Test doubles for every collaborator seam, plus a builder wiring them
//! into a handler.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use warble::auth::{AuthClient, AuthError};
use warble::collab::{ChatLog, CommandSink, Outbound, SettingsStore};
use warble::config::{Config, IdentityConfig, ServerConfig};
use warble::handler::{Handler, HandlerParams};
use warble::settings::MemorySettings;

/// Everything the command layer can observe, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Message {
        sender: String,
        room: Option<String>,
        text: String,
    },
    Tournament {
        room: String,
        tag: String,
        args: Vec<String>,
    },
    Modnote {
        room: String,
        note: String,
    },
    Join {
        user: String,
        room: String,
    },
    Ready,
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub fn messages(&self) -> Vec<SinkEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, SinkEvent::Message { .. }))
            .collect()
    }
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn handle_message(&self, sender: &str, room: Option<&str>, text: &str) {
        self.events.lock().push(SinkEvent::Message {
            sender: sender.to_owned(),
            room: room.map(str::to_owned),
            text: text.to_owned(),
        });
    }

    async fn handle_tournament(&self, room: &str, tag: &str, args: &[String]) {
        self.events.lock().push(SinkEvent::Tournament {
            room: room.to_owned(),
            tag: tag.to_owned(),
            args: args.to_vec(),
        });
    }

    async fn handle_modnote(&self, room: &str, note: &str) {
        self.events.lock().push(SinkEvent::Modnote {
            room: room.to_owned(),
            note: note.to_owned(),
        });
    }

    async fn handle_join(&self, user: &str, room: &str) {
        self.events.lock().push(SinkEvent::Join {
            user: user.to_owned(),
            room: room.to_owned(),
        });
    }

    async fn connection_ready(&self) {
        self.events.lock().push(SinkEvent::Ready);
    }
}

/// Records outbound wire lines in `room|text` form.
#[derive(Default)]
pub struct RecordingOutbound {
    pub lines: Mutex<Vec<String>>,
}

impl RecordingOutbound {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

#[async_trait]
impl Outbound for RecordingOutbound {
    async fn send(&self, room: Option<&str>, text: &str) {
        self.lines
            .lock()
            .push(format!("{}|{}", room.unwrap_or(""), text));
    }
}

#[derive(Default)]
pub struct RecordingChatLog {
    /// (timestamp, room, user_id, text) tuples in log order.
    pub entries: Mutex<Vec<(String, String, String, String)>>,
}

impl ChatLog for RecordingChatLog {
    fn log_chat(&self, timestamp: &str, room: &str, user_id: &str, text: &str) {
        self.entries.lock().push((
            timestamp.to_owned(),
            room.to_owned(),
            user_id.to_owned(),
            text.to_owned(),
        ));
    }
}

/// Canned login endpoint recording every exchange.
pub struct StubAuth {
    pub body: String,
    /// (url, username, password, challenge) per call.
    pub calls: Mutex<Vec<(String, String, String, String)>>,
}

impl StubAuth {
    /// A successful exchange returning `assertion`.
    pub fn ok(assertion: &str) -> Self {
        Self::raw(&format!("]{{\"assertion\":\"{assertion}\"}}"))
    }

    /// An exchange returning `body` verbatim.
    pub fn raw(body: &str) -> Self {
        Self {
            body: body.to_owned(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AuthClient for StubAuth {
    async fn exchange(
        &self,
        url: &str,
        username: &str,
        password: &str,
        challenge: &str,
    ) -> Result<String, AuthError> {
        self.calls.lock().push((
            url.to_owned(),
            username.to_owned(),
            password.to_owned(),
            challenge.to_owned(),
        ));
        Ok(self.body.clone())
    }
}

pub fn test_config(rooms: &[&str]) -> Config {
    Config {
        server: ServerConfig {
            host: "chat.test".to_owned(),
            port: 8000,
            tls: false,
            path: "/ws".to_owned(),
            login_url: "http://chat.test/action.php".to_owned(),
        },
        identity: IdentityConfig {
            username: "Warble".to_owned(),
            password: "hunter2".to_owned(),
            avatar: 246,
        },
        rooms: rooms.iter().map(|r| (*r).to_owned()).collect(),
        join_pacing_ms: 10,
        settings_path: "unused.json".to_owned(),
    }
}

pub struct TestBot {
    pub handler: Handler,
    pub sink: Arc<RecordingSink>,
    pub outbound: Arc<RecordingOutbound>,
    pub auth: Arc<StubAuth>,
    pub chat_log: Arc<RecordingChatLog>,
}

pub fn build_bot(config: Config, auth: StubAuth, settings: Arc<MemorySettings>) -> TestBot {
    let sink = Arc::new(RecordingSink::default());
    let outbound = Arc::new(RecordingOutbound::default());
    let chat_log = Arc::new(RecordingChatLog::default());
    let auth = Arc::new(auth);

    let handler = Handler::new(HandlerParams {
        config,
        auth: auth.clone(),
        command_sink: sink.clone(),
        chat_log: chat_log.clone(),
        settings: settings as Arc<dyn SettingsStore>,
        outbound: outbound.clone(),
    });

    TestBot {
        handler,
        sink,
        outbound,
        auth,
        chat_log,
    }
}

/// A bot with a single configured room, logged in as "Warble".
pub async fn logged_in_bot() -> TestBot {
    let mut bot = build_bot(
        test_config(&["lobby"]),
        StubAuth::ok("tok3n"),
        Arc::new(MemorySettings::default()),
    );
    bot.handler
        .handle_frame("|challstr|4|abcdef")
        .await
        .unwrap();
    bot
}
