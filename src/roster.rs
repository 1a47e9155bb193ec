//! Per-room roster bookkeeping.
//!
//! Each room maps normalized user ids to their display identity. Rosters
//! are bulk-seeded when a room initializes and incrementally mutated by
//! join/leave/rename traffic afterwards.

use std::collections::HashMap;

use warble_proto::to_id;

/// One roster entry: the display identity behind a normalized id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Display name as received, rank glyph included.
    pub display: String,
    /// Normalized id; the roster key.
    pub id: String,
}

impl RosterEntry {
    fn new(display: &str) -> Self {
        Self {
            display: display.to_owned(),
            id: to_id(display),
        }
    }
}

/// Rosters for every room the bot knows about, keyed by room id and then
/// by normalized user id.
#[derive(Debug, Default)]
pub struct RosterStore {
    rooms: HashMap<String, HashMap<String, RosterEntry>>,
}

impl RosterStore {
    /// Replace a room's roster wholesale. Creates the room if needed.
    pub fn bulk_set<S: AsRef<str>>(&mut self, room: &str, users: &[S]) {
        let roster = users
            .iter()
            .map(|u| {
                let entry = RosterEntry::new(u.as_ref());
                (entry.id.clone(), entry)
            })
            .collect();
        self.rooms.insert(room.to_owned(), roster);
    }

    /// Insert or overwrite one user. Creates the room if needed.
    pub fn add(&mut self, room: &str, display: &str) {
        let entry = RosterEntry::new(display);
        self.rooms
            .entry(room.to_owned())
            .or_default()
            .insert(entry.id.clone(), entry);
    }

    /// Remove one user by display name. Returns `false` when the room is
    /// unknown or the user was not present.
    pub fn remove(&mut self, room: &str, display: &str) -> bool {
        match self.rooms.get_mut(room) {
            Some(roster) => roster.remove(&to_id(display)).is_some(),
            None => false,
        }
    }

    /// Apply a rename as one unit: the old identity goes, the new one
    /// arrives, with no intermediate state visible to callers.
    pub fn rename(&mut self, room: &str, new_display: &str, old_display: &str) {
        let roster = self.rooms.entry(room.to_owned()).or_default();
        roster.remove(&to_id(old_display));
        let entry = RosterEntry::new(new_display);
        roster.insert(entry.id.clone(), entry);
    }

    /// Whether `display` (under normalization) is present in `room`.
    pub fn contains(&self, room: &str, display: &str) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|roster| roster.contains_key(&to_id(display)))
    }

    /// Number of users in `room`; zero for unknown rooms.
    pub fn room_len(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, HashMap::len)
    }

    /// The entry behind a normalized id, if present.
    pub fn get(&self, room: &str, user_id: &str) -> Option<&RosterEntry> {
        self.rooms.get(room)?.get(user_id)
    }
}
