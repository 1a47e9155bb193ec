//! Collaborator interfaces.
//!
//! The protocol handler treats everything beyond the wire as an injected
//! dependency with an explicit contract: the command layer, the persisted
//! settings store, the chat log, and the outbound connection. Production
//! implementations are chosen at startup; tests substitute their own.

use async_trait::async_trait;
use tracing::{debug, info};

/// The command-processing layer chat text is forwarded to.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// A chat or private message from another user. `room` is `None` for
    /// private messages.
    async fn handle_message(&self, sender: &str, room: Option<&str>, text: &str);

    /// One tournament sub-command, in batch order.
    async fn handle_tournament(&self, room: &str, tag: &str, args: &[String]);

    /// A moderator-note annotation scoped to a room.
    async fn handle_modnote(&self, room: &str, note: &str);

    /// A user joined a room the bot is in.
    async fn handle_join(&self, user: &str, room: &str);

    /// The connection is authenticated and ready for interactive commands.
    async fn connection_ready(&self);
}

/// Persisted settings storage: named string lists.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// All values under `key`, in insertion order.
    async fn list(&self, key: &str) -> Vec<String>;

    /// Remove every occurrence of `value` under `key`.
    async fn remove(&self, key: &str, value: &str);
}

/// Sink for the room chat log.
pub trait ChatLog: Send + Sync {
    /// Record one timestamped room message. `timestamp` is the raw
    /// epoch-seconds string from the wire.
    fn log_chat(&self, timestamp: &str, room: &str, user_id: &str, text: &str);
}

/// The outbound side of the connection: `send(room, text)` writes one
/// `room|text` line to the service.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Send one command line, targeting `room` (global when `None`).
    async fn send(&self, room: Option<&str>, text: &str);
}

/// Default command sink: logs traffic and otherwise does nothing. The real
/// command layer implements [`CommandSink`] and replaces this at
/// construction.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl CommandSink for LogSink {
    async fn handle_message(&self, sender: &str, room: Option<&str>, text: &str) {
        debug!(sender = %sender, room = ?room, text = %text, "message");
    }

    async fn handle_tournament(&self, room: &str, tag: &str, args: &[String]) {
        debug!(room = %room, tag = %tag, args = ?args, "tournament");
    }

    async fn handle_modnote(&self, room: &str, note: &str) {
        debug!(room = %room, note = %note, "modnote");
    }

    async fn handle_join(&self, user: &str, room: &str) {
        debug!(user = %user, room = %room, "join");
    }

    async fn connection_ready(&self) {
        info!("command layer ready");
    }
}

/// Chat log sink writing through `tracing` under the `chat` target.
#[derive(Debug, Default)]
pub struct TracingChatLog;

impl ChatLog for TracingChatLog {
    fn log_chat(&self, timestamp: &str, room: &str, user_id: &str, text: &str) {
        let when = timestamp
            .parse::<i64>()
            .ok()
            .and_then(|t| chrono::DateTime::from_timestamp(t, 0))
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| timestamp.to_owned());
        info!(target: "chat", room = %room, user = %user_id, time = %when, "{text}");
    }
}
