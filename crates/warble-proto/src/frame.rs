//! Frame decoding.
//!
//! An inbound frame is a pipe-delimited string that may contain embedded
//! newlines (moderator-note decoration, tournament sub-commands, roster
//! dumps). Decoding is driven by the second pipe field, the type tag.

use crate::error::{ProtocolError, Result};
use crate::event::{Event, Modnote, ParsedFrame, TournamentEntry};
use crate::ident::to_id;

/// The room a frame targets when its first field normalizes to nothing.
pub const GLOBAL_ROOM: &str = "lobby";

impl ParsedFrame {
    /// Decode one raw frame.
    ///
    /// Returns [`ProtocolError::EmptyFrame`] for the empty string; every
    /// other input decodes, with unknown type tags surfacing as
    /// [`Event::Unsupported`].
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(ProtocolError::EmptyFrame);
        }

        let fields: Vec<&str> = raw.split('|').collect();
        let first_lines: Vec<&str> = fields[0].split('\n').collect();

        // A parenthesis opening the frame itself means there is no room
        // header at all; the whole frame scopes to the global room.
        let mut room_id = to_id(first_lines[0]);
        if room_id.is_empty() || fields[0].starts_with('(') {
            room_id = GLOBAL_ROOM.to_owned();
        }

        let modnote = extract_modnote(fields[0], &first_lines, &room_id);
        let event = decode_event(&fields);

        Ok(Self {
            room_id,
            event,
            modnote,
        })
    }
}

/// Moderator notes ride on the first pipe field: either the field itself
/// opens a parenthesis (global scope) or its second line does (room scope).
/// The note is the field's last line, stripped of enclosing parentheses.
fn extract_modnote(first_field: &str, first_lines: &[&str], room_id: &str) -> Option<Modnote> {
    let global = first_field.starts_with('(');
    let scoped = first_lines.len() > 1 && first_lines[1].starts_with('(');
    if !global && !scoped {
        return None;
    }

    let last = first_lines.last().copied().unwrap_or("");
    let text = last.strip_prefix('(').unwrap_or(last);
    let text = text.strip_suffix(')').unwrap_or(text);

    Some(Modnote {
        room_id: room_id.to_owned(),
        text: text.to_owned(),
    })
}

fn decode_event(fields: &[&str]) -> Event {
    let tag = field(fields, 1);
    match tag {
        "challstr" => Event::AuthChallenge {
            challenge: rest(fields, 2),
        },
        "updateuser" => Event::UserUpdate {
            username: field(fields, 2).to_owned(),
        },
        "J" | "j" => Event::UserJoin {
            user: field(fields, 2).to_owned(),
        },
        "L" | "l" => Event::UserLeave {
            user: field(fields, 2).to_owned(),
        },
        "N" | "n" => Event::UserRename {
            user: field(fields, 2).to_owned(),
            old: field(fields, 3).to_owned(),
        },
        "noinit" | "deinit" => Event::RoomUnavailable,
        "init" => Event::RoomInit {
            users: decode_roster(fields),
        },
        "pm" => {
            // fields[3] is the receiver (us); discarded.
            let text = rest(fields, 4);
            Event::PrivateMessage {
                sender: field(fields, 2).to_owned(),
                text: text.trim().to_owned(),
            }
        }
        "c" => {
            let text = rest(fields, 3);
            Event::ChatMessage {
                sender: field(fields, 2).to_owned(),
                text: text.trim().to_owned(),
            }
        }
        "c:" => {
            // Only the first embedded line is the message body.
            let text = rest(fields, 4);
            let text = text.trim().lines().next().unwrap_or("");
            Event::TimestampedChat {
                timestamp: field(fields, 2).to_owned(),
                sender: field(fields, 3).to_owned(),
                text: text.to_owned(),
            }
        }
        "tournament" => Event::Tournament {
            entries: decode_tournament(fields),
        },
        other => Event::Unsupported {
            tag: other.to_owned(),
        },
    }
}

/// Roster dumps arrive comma-joined in the seventh field of a fully-headed
/// init frame, with a room-type marker as the first token. Shorter frames
/// place the dump on the line after the room type; frames with neither seed
/// an empty roster.
fn decode_roster(fields: &[&str]) -> Vec<String> {
    if let Some(dump) = fields.get(6) {
        return split_roster(dump.trim(), 1);
    }
    let remainder = rest(fields, 2);
    match remainder.split_once('\n') {
        Some((_, dump)) => split_roster(dump.trim(), 0),
        None => Vec::new(),
    }
}

fn split_roster(dump: &str, skip: usize) -> Vec<String> {
    dump.split(',')
        .skip(skip)
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Each embedded line of a tournament batch carries its own leading
/// `|tournament|` prefix, so the sub-command tag sits at index 2 after the
/// re-split.
fn decode_tournament(fields: &[&str]) -> Vec<TournamentEntry> {
    let joined = format!("|{}", rest(fields, 1));
    joined
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            let sub: Vec<&str> = line.split('|').collect();
            TournamentEntry {
                tag: field(&sub, 2).to_owned(),
                args: sub
                    .get(3..)
                    .unwrap_or_default()
                    .iter()
                    .map(|s| (*s).to_owned())
                    .collect(),
            }
        })
        .collect()
}

fn field<'a>(fields: &[&'a str], idx: usize) -> &'a str {
    fields.get(idx).copied().unwrap_or("")
}

fn rest(fields: &[&str], from: usize) -> String {
    fields.get(from..).unwrap_or_default().join("|")
}
