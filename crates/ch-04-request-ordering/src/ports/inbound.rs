//! # Inbound Ports
//!
//! What the request server offers to clients.

use crate::domain::{OrderingError, QueuedRequest};
use ch_01_logical_clock::LogicalClock;
use shared_types::LogicalTimestamp;

/// Ordering API - inbound port.
///
/// Clock handling (observe on receive, tick on reply) is the caller's job.
pub trait OrderingApi: Send + Sync {
    /// The server's clock.
    fn clock(&self) -> &LogicalClock;

    /// Log and service one request. Returns the reply text.
    fn accept(&self, song: String, timestamp: LogicalTimestamp) -> Result<String, OrderingError>;

    /// Copy of the pending log, lowest timestamp first.
    fn pending(&self) -> Vec<QueuedRequest>;
}
