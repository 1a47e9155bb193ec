//! Error types for the protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
///
/// Decoding is otherwise total: unknown type tags are data
/// ([`Unsupported`](crate::Event::Unsupported)), not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The frame was empty. Empty frames carry nothing and are skipped by
    /// callers rather than dispatched.
    #[error("empty frame")]
    EmptyFrame,
}
