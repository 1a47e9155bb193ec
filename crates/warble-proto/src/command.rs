//! Outbound command construction and wire encoding.
//!
//! Outbound traffic is `<roomIdOrEmpty>|<command text>`, where the command
//! text usually begins with `/`. [`ClientCommand`] covers the commands the
//! handler emits; [`ClientCommand::encode`] renders the wire form.

use std::borrow::Cow;
use std::fmt;

/// Maximum number of rooms the initial autojoin command may carry; the
/// protocol rejects larger batches. Overflow goes through the join queue.
pub const AUTOJOIN_BATCH_LIMIT: usize = 11;

/// A command the client sends to the service.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClientCommand {
    /// Select an avatar.
    Avatar(u32),
    /// Join the initial room batch. Callers cap the list at
    /// [`AUTOJOIN_BATCH_LIMIT`].
    Autojoin(Vec<String>),
    /// Claim a username with the authentication token from the login
    /// exchange.
    Trn {
        /// The username to claim.
        name: String,
        /// The opaque token ("assertion") returned by the login exchange.
        assertion: String,
    },
    /// Join a single room.
    Join(String),
    /// Send a private message.
    Whisper {
        /// Recipient display name or id.
        to: String,
        /// Message text.
        text: String,
    },
    /// Send a chat message to a room.
    Chat {
        /// Target room id.
        room: String,
        /// Message text.
        text: String,
    },
}

impl ClientCommand {
    /// Split the command into its wire parts: the target room (if any) and
    /// the command text.
    pub fn parts(&self) -> (Option<&str>, Cow<'_, str>) {
        match self {
            Self::Avatar(n) => (None, Cow::Owned(format!("/avatar {n}"))),
            Self::Autojoin(rooms) => (None, Cow::Owned(format!("/autojoin {}", rooms.join(",")))),
            Self::Trn { name, assertion } => {
                (None, Cow::Owned(format!("/trn {name},0,{assertion}")))
            }
            Self::Join(room) => (None, Cow::Owned(format!("/join {room}"))),
            Self::Whisper { to, text } => (None, Cow::Owned(format!("/w {to}, {text}"))),
            Self::Chat { room, text } => (Some(room), Cow::Borrowed(text)),
        }
    }

    /// Render the full `room|text` wire form.
    pub fn encode(&self) -> String {
        let (room, text) = self.parts();
        format!("{}|{}", room.unwrap_or(""), text)
    }
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
