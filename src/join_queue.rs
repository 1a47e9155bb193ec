//! The join queue: rooms beyond the initial autojoin batch, joined one at
//! a time.
//!
//! A queued room is joined in two steps: a pacing delay, then a `/join`
//! for the queue head. The head is only popped when the service
//! acknowledges it (room init or refusal), which keeps exactly one join in
//! flight. The pacing timer is keyed by room id and cancellable, so a
//! cleared queue never fires a stale join.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use warble_proto::ClientCommand;

use crate::collab::Outbound;

struct PendingJoin {
    room: String,
    task: JoinHandle<()>,
}

/// Ordered rooms awaiting a join; each room appears at most once.
pub struct JoinQueue {
    queue: Vec<String>,
    pacing: Duration,
    outbound: Arc<dyn Outbound>,
    pending: Option<PendingJoin>,
}

impl JoinQueue {
    /// Create an empty queue writing joins to `outbound` after `pacing`.
    pub fn new(pacing: Duration, outbound: Arc<dyn Outbound>) -> Self {
        Self {
            queue: Vec::new(),
            pacing,
            outbound,
            pending: None,
        }
    }

    /// Append rooms, skipping any already queued.
    pub fn push<I: IntoIterator<Item = String>>(&mut self, rooms: I) {
        for room in rooms {
            if !self.queue.contains(&room) {
                self.queue.push(room);
            }
        }
    }

    /// Number of rooms still awaiting a join.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether `room` is still queued.
    pub fn contains(&self, room: &str) -> bool {
        self.queue.iter().any(|r| r == room)
    }

    /// Advance the queue.
    ///
    /// With a room id, that room is removed (its join was acknowledged or
    /// refused); without one, the current head is scheduled — the initial
    /// trigger after login. Returns whether a room was removed; callers use
    /// that to decide persisted-storage cleanup. A room id not present in
    /// the queue is a no-op and schedules nothing.
    pub fn advance(&mut self, room_id: Option<&str>) -> bool {
        let removed = match room_id {
            Some(rid) => {
                let Some(idx) = self.queue.iter().position(|r| r == rid) else {
                    return false;
                };
                self.queue.remove(idx);
                if self.pending.as_ref().is_some_and(|p| p.room == rid) {
                    if let Some(p) = self.pending.take() {
                        p.task.abort();
                    }
                }
                true
            }
            None => false,
        };

        if let Some(head) = self.queue.first().cloned() {
            self.schedule(head);
        }
        removed
    }

    /// Drop everything, cancelling any pending join.
    pub fn clear(&mut self) {
        if let Some(p) = self.pending.take() {
            p.task.abort();
        }
        self.queue.clear();
    }

    fn schedule(&mut self, room: String) {
        // A newer schedule supersedes whatever was pending.
        if let Some(prev) = self.pending.take() {
            prev.task.abort();
        }
        debug!(room = %room, "scheduling join");

        let outbound = Arc::clone(&self.outbound);
        let pacing = self.pacing;
        let task = tokio::spawn({
            let room = room.clone();
            async move {
                tokio::time::sleep(pacing).await;
                let cmd = ClientCommand::Join(room);
                let (target, text) = cmd.parts();
                outbound.send(target, &text).await;
            }
        });
        self.pending = Some(PendingJoin { room, task });
    }
}

impl Drop for JoinQueue {
    fn drop(&mut self) {
        if let Some(p) = self.pending.take() {
            p.task.abort();
        }
    }
}
