//! Typed events decoded from inbound frames.
//!
//! Every frame resolves to exactly one [`Event`], optionally decorated with
//! a [`Modnote`]. The enum is closed and matched exhaustively by the
//! dispatcher; unknown type tags surface as [`Event::Unsupported`] so they
//! can be logged without aborting the stream.

/// One decoded inbound frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedFrame {
    /// Normalized id of the room the frame targets. Frames with an empty
    /// first field target the global room.
    pub room_id: String,
    /// The main event carried by the frame.
    pub event: Event,
    /// Moderator-note annotation, when the frame carries one. This is a
    /// side channel: the main event still applies.
    pub modnote: Option<Modnote>,
}

/// A moderator-note annotation: an out-of-band line wrapped in parentheses,
/// scoped to a room.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modnote {
    /// Normalized id of the room the note is scoped to. Falls back to the
    /// global room when the parenthesis opened the frame itself.
    pub room_id: String,
    /// The note text, stripped of its enclosing parentheses.
    pub text: String,
}

/// The event kinds a frame can decode to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// The service issued a login challenge; triggers the credential
    /// exchange.
    AuthChallenge {
        /// The opaque challenge string, pipes preserved.
        challenge: String,
    },
    /// The service confirmed a username change.
    UserUpdate {
        /// Display name as confirmed, compared verbatim against our own.
        username: String,
    },
    /// A user joined the target room.
    UserJoin {
        /// Display name, possibly carrying a leading rank glyph.
        user: String,
    },
    /// A user left the target room.
    UserLeave {
        /// Display name as received.
        user: String,
    },
    /// A user changed names in the target room.
    UserRename {
        /// The new display name.
        user: String,
        /// The old display name.
        old: String,
    },
    /// The target room could not be joined, or was torn down.
    RoomUnavailable,
    /// The target room finished initializing and sent its roster dump.
    RoomInit {
        /// Display names of everyone present, in dump order.
        users: Vec<String>,
    },
    /// A private message addressed to us.
    PrivateMessage {
        /// Sender display name.
        sender: String,
        /// Message text.
        text: String,
    },
    /// A chat message in the target room.
    ChatMessage {
        /// Sender display name.
        sender: String,
        /// Message text.
        text: String,
    },
    /// A chat message in the target room, prefixed with a server timestamp.
    TimestampedChat {
        /// Epoch-seconds timestamp as sent by the service. Carried for the
        /// chat log; not interpreted here.
        timestamp: String,
        /// Sender display name.
        sender: String,
        /// Message text, first embedded line only.
        text: String,
    },
    /// A batch of tournament sub-commands, order preserved.
    Tournament {
        /// The sub-commands, one per embedded line.
        entries: Vec<TournamentEntry>,
    },
    /// A type tag this library does not understand. Logged at low severity
    /// by the caller; no state changes.
    Unsupported {
        /// The unrecognized tag.
        tag: String,
    },
}

/// One tournament sub-command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentEntry {
    /// The sub-command tag (`create`, `update`, `end`, ...).
    pub tag: String,
    /// The remaining pipe-separated arguments.
    pub args: Vec<String>,
}
