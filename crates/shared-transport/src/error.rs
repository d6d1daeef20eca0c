//! # Transport Errors

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors from sending or receiving a frame.
///
/// All of these are non-fatal to the component that hits them: protocol
/// callers turn them into an implicit NO vote or a failed result, and the
/// server drops just the affected connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not open a connection.
    #[error("Connection to {addr} failed: {source}")]
    Connect {
        /// Target address.
        addr: String,
        /// Underlying error.
        source: io::Error,
    },

    /// Could not bind the listening socket.
    #[error("Bind on {addr} failed: {source}")]
    Bind {
        /// Requested address.
        addr: String,
        /// Underlying error.
        source: io::Error,
    },

    /// The exchange did not finish in time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Read or write failed mid-exchange (reset, early EOF, ...).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The payload was not valid JSON for the expected type.
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The length prefix announced an oversized frame.
    #[error("Frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge {
        /// Announced length.
        len: usize,
        /// Configured limit.
        max: usize,
    },
}

impl TransportError {
    /// Check if this error is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
