//! Sans-IO session state machine for login and autojoin.
//!
//! The machine consumes parsed events and produces actions; it performs no
//! I/O itself. The driver executes the actions: sending commands, running
//! the credential exchange, priming the join queue. This keeps the whole
//! login flow unit-testable without a network.

use serde::Deserialize;
use thiserror::Error;

use warble_proto::{to_id, ClientCommand, Event, AUTOJOIN_BATCH_LIMIT};

/// Current state of the session lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Initial state, no challenge seen yet.
    #[default]
    Disconnected,
    /// The service issued a challenge; the exchange is being prepared.
    ChallengeReceived,
    /// The credential exchange is in flight.
    LoggingIn,
    /// The exchange succeeded; setup commands are being issued.
    Authenticated,
    /// Setup complete; the session is live.
    Ready,
    /// Login failed. Terminal: the process exits.
    Failed,
}

/// Errors that end the session. Authentication is all-or-nothing; there is
/// no retry path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// The response body was not the expected `]`-prefixed JSON envelope.
    #[error("login response was not the expected envelope")]
    MalformedEnvelope,
    /// The service refused the credentials.
    #[error("the service rejected the login")]
    Rejected,
}

/// Actions produced by the session machine.
///
/// The driver is responsible for carrying these out, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Send this command to the service.
    ///
    /// Boxed to reduce enum size variance.
    Send(Box<ClientCommand>),
    /// Run the credential exchange with this challenge, then feed the body
    /// back via [`LoginMachine::login_response`].
    BeginLogin {
        /// The challenge string from the service.
        challenge: String,
    },
    /// Push these rooms onto the join queue; they exceeded the autojoin
    /// batch.
    QueueJoins(Vec<String>),
    /// Trigger the first join queue advance.
    AdvanceJoins,
    /// Tell the command layer the connection accepts interactive commands.
    SignalReady,
    /// Login failed; terminate.
    Fatal(LoginError),
}

/// The `]`-prefixed JSON envelope returned by the login endpoint.
#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    assertion: Option<String>,
}

/// Sentinel prefix on an assertion denoting rejection.
const REJECTION_SENTINEL: char = ';';

/// Sans-IO state machine for the login/autojoin lifecycle.
#[derive(Debug)]
pub struct LoginMachine {
    username: String,
    avatar: u32,
    rooms: Vec<String>,
    state: SessionState,
    user_id: Option<String>,
    join_list_len: usize,
    post_login_done: bool,
}

impl LoginMachine {
    /// Create a machine for `username`, joining `rooms` (plus whatever the
    /// persisted store adds at login time).
    pub fn new(username: &str, avatar: u32, rooms: Vec<String>) -> Self {
        Self {
            username: username.to_owned(),
            avatar,
            rooms,
            state: SessionState::default(),
            user_id: None,
            join_list_len: 0,
            post_login_done: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Our own normalized id, known once authenticated. The dispatcher uses
    /// this for loop prevention.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Feed a parsed event. Only challenge and user-update events drive the
    /// machine; everything else is inert here.
    pub fn feed(&mut self, event: &Event) -> Vec<SessionAction> {
        match event {
            Event::AuthChallenge { challenge } => self.on_challenge(challenge),
            Event::UserUpdate { username } => self.on_user_update(username),
            _ => Vec::new(),
        }
    }

    /// Feed the raw body of the credential exchange together with the
    /// persisted extra rooms. Produces the setup sequence on success and
    /// [`SessionAction::Fatal`] on rejection.
    pub fn login_response(
        &mut self,
        body: &str,
        persisted_rooms: Vec<String>,
    ) -> Vec<SessionAction> {
        if !matches!(
            self.state,
            SessionState::ChallengeReceived | SessionState::LoggingIn
        ) {
            return Vec::new();
        }
        self.state = SessionState::LoggingIn;

        match extract_assertion(body) {
            Ok(assertion) => {
                self.state = SessionState::Authenticated;
                self.setup(assertion, persisted_rooms)
            }
            Err(e) => {
                self.state = SessionState::Failed;
                vec![SessionAction::Fatal(e)]
            }
        }
    }

    fn on_challenge(&mut self, challenge: &str) -> Vec<SessionAction> {
        match self.state {
            SessionState::Disconnected => {
                self.state = SessionState::ChallengeReceived;
                vec![SessionAction::BeginLogin {
                    challenge: challenge.to_owned(),
                }]
            }
            // A repeated challenge while an exchange is in flight (or after
            // login) carries no new information.
            _ => Vec::new(),
        }
    }

    /// The post-login setup sequence: avatar, the capped autojoin batch,
    /// the name claim, and the join queue overflow.
    fn setup(&mut self, assertion: String, persisted_rooms: Vec<String>) -> Vec<SessionAction> {
        self.user_id = Some(to_id(&self.username));

        let mut join_list = self.rooms.clone();
        for room in persisted_rooms {
            if !join_list.contains(&room) {
                join_list.push(room);
            }
        }
        self.join_list_len = join_list.len();

        let batch: Vec<String> = join_list
            .iter()
            .take(AUTOJOIN_BATCH_LIMIT)
            .cloned()
            .collect();

        let mut actions = vec![
            SessionAction::Send(Box::new(ClientCommand::Avatar(self.avatar))),
            SessionAction::Send(Box::new(ClientCommand::Autojoin(batch))),
            SessionAction::Send(Box::new(ClientCommand::Trn {
                name: self.username.clone(),
                assertion,
            })),
        ];
        if join_list.len() > AUTOJOIN_BATCH_LIMIT {
            actions.push(SessionAction::QueueJoins(
                join_list.split_off(AUTOJOIN_BATCH_LIMIT),
            ));
        }

        self.state = SessionState::Ready;
        actions
    }

    fn on_user_update(&mut self, username: &str) -> Vec<SessionAction> {
        // The service echoes the name verbatim; guest renames and other
        // users never match.
        if username != self.username {
            return Vec::new();
        }
        if self.state != SessionState::Ready || self.post_login_done {
            return Vec::new();
        }
        self.post_login_done = true;

        let mut actions = Vec::new();
        if self.join_list_len > AUTOJOIN_BATCH_LIMIT {
            actions.push(SessionAction::AdvanceJoins);
        }
        actions.push(SessionAction::SignalReady);
        actions
    }
}

fn extract_assertion(body: &str) -> Result<String, LoginError> {
    let payload = body
        .strip_prefix(']')
        .ok_or(LoginError::MalformedEnvelope)?;
    let envelope: LoginEnvelope =
        serde_json::from_str(payload).map_err(|_| LoginError::MalformedEnvelope)?;
    let assertion = envelope.assertion.ok_or(LoginError::Rejected)?;
    if assertion.starts_with(REJECTION_SENTINEL) {
        return Err(LoginError::Rejected);
    }
    Ok(assertion)
}
