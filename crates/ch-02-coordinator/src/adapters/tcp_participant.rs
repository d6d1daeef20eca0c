//! # TCP Participant Client
//!
//! [`ParticipantClient`] over `shared-transport`.

use crate::domain::{CoordinatorError, ParticipantAddress};
use crate::ports::ParticipantClient;
use async_trait::async_trait;
use shared_types::{ParticipantReply, ParticipantRequest};
use std::time::Duration;

/// Reaches participants over TCP, one connection per message.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpParticipantClient;

impl TcpParticipantClient {
    /// Create a client.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ParticipantClient for TcpParticipantClient {
    async fn send(
        &self,
        target: &ParticipantAddress,
        request: ParticipantRequest,
        timeout: Duration,
    ) -> Result<ParticipantReply, CoordinatorError> {
        let reply = shared_transport::request(&target.to_string(), &request, timeout).await?;
        Ok(reply)
    }
}
