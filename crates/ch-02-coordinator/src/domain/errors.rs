//! # Domain Errors

use shared_transport::TransportError;
use shared_types::{ProtocolError, TransactionId, TransactionState};
use thiserror::Error;

/// Coordinator error types.
///
/// None of these are process-fatal. A participant's transport failure
/// becomes an implicit `no` vote or an `undelivered` entry before it ever
/// reaches a caller.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Transaction request named an operation other than add/remove.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Illegal state change on a transaction record.
    #[error("Transaction {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Transaction affected.
        id: TransactionId,
        /// Current state.
        from: TransactionState,
        /// Requested state.
        to: TransactionState,
    },

    /// No record with this id.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Talking to a participant failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A participant answered with the wrong message.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// `start()` on a server that is already listening.
    #[error("Coordinator server already running")]
    AlreadyRunning,
}
