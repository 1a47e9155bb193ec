//! Event routing.
//!
//! One decoded frame comes in; roster mutations and collaborator calls go
//! out. Messages whose sender normalizes to our own id are dropped here —
//! the bot must never converse with itself.

use std::sync::Arc;

use tracing::debug;

use warble_proto::{to_id, Event, ParsedFrame};

use crate::collab::{ChatLog, CommandSink};
use crate::roster::RosterStore;

/// What the dispatcher could not fully consume: session traffic and join
/// acknowledgements, handed back to the caller.
#[derive(Debug)]
pub enum Routed {
    /// Nothing further to do.
    Done,
    /// A session lifecycle event for the login machine.
    Session(Event),
    /// A room acknowledged (or refused) a join; the join queue advances.
    JoinAck {
        /// The acknowledging room.
        room: String,
        /// Whether the room should also be dropped from persisted storage
        /// (refusals prune stale private rooms).
        drop_persisted: bool,
    },
}

/// Routes decoded events to the roster store and the collaborators.
pub struct Dispatcher {
    sink: Arc<dyn CommandSink>,
    chat_log: Arc<dyn ChatLog>,
}

impl Dispatcher {
    /// Create a dispatcher over the given collaborators.
    pub fn new(sink: Arc<dyn CommandSink>, chat_log: Arc<dyn ChatLog>) -> Self {
        Self { sink, chat_log }
    }

    /// Route one decoded frame. `own_id` is our normalized id once
    /// authenticated; before that nothing is suppressed.
    pub async fn route(
        &self,
        frame: ParsedFrame,
        roster: &mut RosterStore,
        own_id: Option<&str>,
    ) -> Routed {
        let ParsedFrame {
            room_id,
            event,
            modnote,
        } = frame;

        if let Some(note) = modnote {
            self.sink.handle_modnote(&note.room_id, &note.text).await;
        }

        match event {
            Event::UserJoin { user } => {
                roster.add(&room_id, &user);
                self.sink.handle_join(&user, &room_id).await;
                Routed::Done
            }
            Event::UserLeave { user } => {
                if !roster.remove(&room_id, &user) {
                    debug!(room = %room_id, user = %user, "leave for unknown roster entry");
                }
                Routed::Done
            }
            Event::UserRename { user, old } => {
                roster.rename(&room_id, &user, &old);
                Routed::Done
            }
            Event::RoomInit { users } => {
                roster.bulk_set(&room_id, &users);
                Routed::JoinAck {
                    room: room_id,
                    drop_persisted: false,
                }
            }
            Event::RoomUnavailable => Routed::JoinAck {
                room: room_id,
                drop_persisted: true,
            },
            Event::PrivateMessage { sender, text } => {
                if !is_self(own_id, &sender) {
                    self.sink.handle_message(&sender, None, &text).await;
                }
                Routed::Done
            }
            Event::ChatMessage { sender, text } => {
                if !is_self(own_id, &sender) {
                    self.sink
                        .handle_message(&sender, Some(&room_id), &text)
                        .await;
                }
                Routed::Done
            }
            Event::TimestampedChat {
                timestamp,
                sender,
                text,
            } => {
                // The chat log sees everything, our own lines included.
                self.chat_log
                    .log_chat(&timestamp, &room_id, &to_id(&sender), &text);
                if !is_self(own_id, &sender) {
                    self.sink
                        .handle_message(&sender, Some(&room_id), &text)
                        .await;
                }
                Routed::Done
            }
            Event::Tournament { entries } => {
                for entry in entries {
                    self.sink
                        .handle_tournament(&room_id, &entry.tag, &entry.args)
                        .await;
                }
                Routed::Done
            }
            event @ (Event::AuthChallenge { .. } | Event::UserUpdate { .. }) => {
                Routed::Session(event)
            }
            Event::Unsupported { tag } => {
                debug!(tag = %tag, "unsupported message type");
                Routed::Done
            }
        }
    }
}

fn is_self(own_id: Option<&str>, sender: &str) -> bool {
    own_id.is_some_and(|id| to_id(sender) == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_self_normalizes_sender() {
        assert!(is_self(Some("warble"), "+Warble"));
        assert!(is_self(Some("warble"), "WARBLE"));
        assert!(!is_self(Some("warble"), "Bob"));
        // Unauthenticated: nothing is ours yet.
        assert!(!is_self(None, "Warble"));
    }
}
