//! # Error Types
//!
//! Errors raised when a decoded message does not fit the exchange it
//! arrived in.

use thiserror::Error;

/// A well-formed reply that is not what the request called for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The peer answered with a different reply kind.
    #[error("Unexpected reply: expected {expected}, got {got}")]
    UnexpectedReply {
        /// Reply kind(s) the caller was waiting for.
        expected: &'static str,
        /// Reply kind that arrived.
        got: &'static str,
    },

    /// The peer answered with an explicit error.
    #[error("Request rejected by peer: {0}")]
    Rejected(String),
}
