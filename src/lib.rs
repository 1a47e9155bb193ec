//! warble - a roster-tracking chat bot core.
//!
//! warble speaks a line-oriented, pipe-delimited chat protocol: it logs in,
//! joins a configured set of rooms, tracks per-room rosters, and forwards
//! chat, private-message and tournament events to a pluggable command
//! layer. Frame decoding lives in the `warble-proto` crate; this crate owns
//! the session lifecycle, the bookkeeping and the wiring.

pub mod auth;
pub mod collab;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod join_queue;
pub mod net;
pub mod roster;
pub mod session;
pub mod settings;
