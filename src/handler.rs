//! The protocol handler: the single event-processing path.
//!
//! One [`Handler`] owns the session machine, the roster store, the join
//! queue and the injected collaborators. Frames are applied strictly in
//! arrival order; every mutation of handler state happens inside
//! [`Handler::handle_frame`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use warble_proto::{ClientCommand, ParsedFrame};

use crate::auth::AuthClient;
use crate::collab::{ChatLog, CommandSink, Outbound, SettingsStore};
use crate::config::Config;
use crate::dispatch::{Dispatcher, Routed};
use crate::error::BotError;
use crate::join_queue::JoinQueue;
use crate::roster::RosterStore;
use crate::session::{LoginMachine, SessionAction, SessionState};
use crate::settings::{AUTOJOIN_KEY, PRIVATE_ROOMS_KEY};

/// Everything a [`Handler`] is built from.
pub struct HandlerParams {
    /// Bot configuration.
    pub config: Config,
    /// The login endpoint.
    pub auth: Arc<dyn AuthClient>,
    /// The command-processing layer.
    pub command_sink: Arc<dyn CommandSink>,
    /// The chat log sink.
    pub chat_log: Arc<dyn ChatLog>,
    /// Persisted settings storage.
    pub settings: Arc<dyn SettingsStore>,
    /// The outbound side of the connection.
    pub outbound: Arc<dyn Outbound>,
}

/// The protocol handler.
pub struct Handler {
    config: Config,
    auth: Arc<dyn AuthClient>,
    sink: Arc<dyn CommandSink>,
    settings: Arc<dyn SettingsStore>,
    outbound: Arc<dyn Outbound>,
    dispatcher: Dispatcher,
    session: LoginMachine,
    roster: RosterStore,
    joins: JoinQueue,
}

impl Handler {
    /// Build a handler from its parts.
    pub fn new(params: HandlerParams) -> Self {
        let HandlerParams {
            config,
            auth,
            command_sink,
            chat_log,
            settings,
            outbound,
        } = params;

        let session = LoginMachine::new(
            &config.identity.username,
            config.identity.avatar,
            config.rooms.clone(),
        );
        let joins = JoinQueue::new(
            Duration::from_millis(config.join_pacing_ms),
            Arc::clone(&outbound),
        );
        let dispatcher = Dispatcher::new(Arc::clone(&command_sink), chat_log);

        Self {
            config,
            auth,
            sink: command_sink,
            settings,
            outbound,
            dispatcher,
            session,
            roster: RosterStore::default(),
            joins,
        }
    }

    /// Apply one inbound frame. Events derived from it are fully applied
    /// before this returns; the caller feeds frames in arrival order.
    pub async fn handle_frame(&mut self, raw: &str) -> Result<(), BotError> {
        // Empty frames carry nothing; skip them.
        let Ok(frame) = ParsedFrame::parse(raw) else {
            return Ok(());
        };

        match self
            .dispatcher
            .route(frame, &mut self.roster, self.session.user_id())
            .await
        {
            Routed::Done => Ok(()),
            Routed::JoinAck {
                room,
                drop_persisted,
            } => {
                let removed = self.joins.advance(Some(room.as_str()));
                if removed && drop_persisted {
                    self.settings.remove(PRIVATE_ROOMS_KEY, &room).await;
                }
                Ok(())
            }
            Routed::Session(event) => {
                let actions = self.session.feed(&event);
                self.run_actions(actions).await
            }
        }
    }

    /// Send one raw command line, targeting `room` (global when `None`).
    pub async fn send(&self, room: Option<&str>, text: &str) {
        self.outbound.send(room, text).await;
    }

    /// Whisper `text` to `user`.
    pub async fn send_pm(&self, user: &str, text: &str) {
        let cmd = ClientCommand::Whisper {
            to: user.to_owned(),
            text: text.to_owned(),
        };
        self.send_command(&cmd).await;
    }

    /// The roster store (read access for the command layer and tests).
    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    /// The join queue (read access for tests).
    pub fn joins(&self) -> &JoinQueue {
        &self.joins
    }

    /// Current session state.
    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    async fn send_command(&self, cmd: &ClientCommand) {
        let (room, text) = cmd.parts();
        self.outbound.send(room, &text).await;
    }

    /// Execute session actions in order. The credential exchange feeds its
    /// follow-up actions onto the same queue, so a login resolves fully
    /// within one frame.
    async fn run_actions(&mut self, actions: Vec<SessionAction>) -> Result<(), BotError> {
        let mut work: VecDeque<SessionAction> = actions.into();
        while let Some(action) = work.pop_front() {
            match action {
                SessionAction::Send(cmd) => self.send_command(&cmd).await,
                SessionAction::BeginLogin { challenge } => {
                    info!("received challenge, logging in");
                    let body = self
                        .auth
                        .exchange(
                            &self.config.server.login_url,
                            &self.config.identity.username,
                            &self.config.identity.password,
                            &challenge,
                        )
                        .await?;
                    let persisted = self.settings.list(AUTOJOIN_KEY).await;
                    work.extend(self.session.login_response(&body, persisted));
                    if self.session.state() == &SessionState::Ready {
                        info!("setup done");
                    }
                }
                SessionAction::QueueJoins(rooms) => {
                    debug!(count = rooms.len(), "queueing rooms beyond the autojoin batch");
                    self.joins.push(rooms);
                }
                SessionAction::AdvanceJoins => {
                    info!("joining additional rooms");
                    self.joins.advance(None);
                }
                SessionAction::SignalReady => {
                    info!(username = %self.config.identity.username, "logged in");
                    self.sink.connection_ready().await;
                }
                SessionAction::Fatal(e) => {
                    error!(error = %e, "cannot log in");
                    return Err(BotError::Login(e));
                }
            }
        }
        Ok(())
    }
}
