//! # Domain Errors

use shared_transport::TransportError;
use shared_types::{ProtocolError, TransactionId};
use thiserror::Error;

/// Participant error types.
#[derive(Debug, Error)]
pub enum ParticipantError {
    /// Reaching the coordinator or request server failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The peer answered with an error or the wrong message.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The ledger store failed.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// No ledger entry for this transaction.
    #[error("No ledger entry for {0}")]
    UnknownTransaction(TransactionId),

    /// `start()` on a server that is already listening.
    #[error("Participant server already running")]
    AlreadyRunning,
}
