//! # Outbound Ports
//!
//! How the coordinator reaches participants.

use crate::domain::{CoordinatorError, ParticipantAddress};
use async_trait::async_trait;
use shared_types::{ParticipantReply, ParticipantRequest};
use std::time::Duration;

/// Participant connection - outbound port.
///
/// One call is one request/response exchange. Implementations must give up
/// after `timeout`.
#[async_trait]
pub trait ParticipantClient: Send + Sync {
    /// Send `request` to the participant at `target` and return its reply.
    async fn send(
        &self,
        target: &ParticipantAddress,
        request: ParticipantRequest,
        timeout: Duration,
    ) -> Result<ParticipantReply, CoordinatorError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================
