//! # warble-proto
//!
//! A library for parsing and encoding the pipe-delimited text protocol
//! spoken by the chat service warble connects to.
//!
//! ## Features
//!
//! - Frame decoding into a closed, typed event enum
//! - Moderator-note side annotations carried alongside the main event
//! - Identifier normalization (the folded form used as roster/room keys)
//! - Outbound command construction and wire encoding
//!
//! The library is sans-IO: no sockets, no timers, no globals. A frame goes
//! in as a string, a [`ParsedFrame`] comes out.
//!
//! ## Quick Start
//!
//! ```rust
//! use warble_proto::{Event, ParsedFrame};
//!
//! let frame = ParsedFrame::parse("lobby|c|Bob|hello").unwrap();
//! assert_eq!(frame.room_id, "lobby");
//! match frame.event {
//!     Event::ChatMessage { sender, text } => {
//!         assert_eq!(sender, "Bob");
//!         assert_eq!(text, "hello");
//!     }
//!     other => panic!("expected chat message, got {other:?}"),
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod event;
pub mod frame;
pub mod ident;

pub use self::command::{ClientCommand, AUTOJOIN_BATCH_LIMIT};
pub use self::error::{ProtocolError, Result};
pub use self::event::{Event, Modnote, ParsedFrame, TournamentEntry};
pub use self::frame::GLOBAL_ROOM;
pub use self::ident::{fold_char, id_eq, to_id};
