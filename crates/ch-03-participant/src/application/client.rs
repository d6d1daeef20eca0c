//! Outbound calls a client makes: registration, playlist mutations and
//! playback requests.

use crate::application::agent::ParticipantAgent;
use crate::domain::ParticipantError;
use crate::ports::LedgerStore;
use shared_types::{
    CoordinatorReply, CoordinatorRequest, Deregistration, Operation, PlaybackReply,
    PlaybackRequest, PlaybackResponse, ProtocolError, Registration, SongId, Stamped,
    TransactionRequest, TransactionResult,
};
use tracing::{info, warn};

impl<L: LedgerStore> ParticipantAgent<L> {
    /// Announce this client's participant listener to the coordinator.
    pub async fn register_with(&self, port: u16) -> Result<(), ParticipantError> {
        let request = CoordinatorRequest::Register(Registration {
            client_id: self.config.node_id.clone(),
            host: self.config.advertise_host.clone(),
            port,
            timestamp: self.clock.tick(),
        });
        let reply = self.call_coordinator(&request, self.config.protocol_timeout).await?;
        match reply {
            CoordinatorReply::Registered { .. } => {
                info!(
                    node = %self.config.node_id,
                    host = %self.config.advertise_host,
                    port,
                    "[ch-03] registered with coordinator"
                );
                Ok(())
            }
            other => Err(unexpected("registered", other)),
        }
    }

    /// Leave the participant set.
    pub async fn deregister(&self) -> Result<(), ParticipantError> {
        let request = CoordinatorRequest::Deregister(Deregistration {
            client_id: self.config.node_id.clone(),
            timestamp: self.clock.tick(),
        });
        let reply = self.call_coordinator(&request, self.config.protocol_timeout).await?;
        match reply {
            CoordinatorReply::Deregistered { .. } => {
                info!(node = %self.config.node_id, "[ch-03] deregistered");
                Ok(())
            }
            other => Err(unexpected("deregistered", other)),
        }
    }

    /// Ask the coordinator to add a song everywhere.
    pub async fn request_add(&self, song_id: SongId) -> Result<TransactionResult, ParticipantError> {
        self.request_mutation(Operation::Add, song_id).await
    }

    /// Ask the coordinator to remove a song everywhere.
    pub async fn request_remove(
        &self,
        song_id: SongId,
    ) -> Result<TransactionResult, ParticipantError> {
        self.request_mutation(Operation::Remove, song_id).await
    }

    async fn request_mutation(
        &self,
        operation: Operation,
        song_id: SongId,
    ) -> Result<TransactionResult, ParticipantError> {
        let request = CoordinatorRequest::Transaction(TransactionRequest {
            client_id: self.config.node_id.clone(),
            operation: operation.into(),
            song_id: song_id.clone(),
            timestamp: self.clock.tick(),
        });
        let reply = self
            .call_coordinator(&request, self.config.transaction_timeout)
            .await?;
        let result = TransactionResult::try_from(reply)?;

        if result.is_committed() {
            self.reconcile(result.transaction_id(), operation, &song_id);
        }
        info!(
            node = %self.config.node_id,
            transaction_id = %result.transaction_id(),
            %operation,
            %song_id,
            committed = result.is_committed(),
            "[ch-03] transaction finished"
        );
        Ok(result)
    }

    /// Ask the ordered request server to play a song.
    pub async fn request_playback(&self, song: &str) -> Result<PlaybackResponse, ParticipantError> {
        let request = PlaybackRequest::new(song, self.clock.tick());
        let reply: PlaybackReply = shared_transport::request(
            &self.config.server_addr,
            &request,
            self.config.protocol_timeout,
        )
        .await?;
        self.clock.observe(reply.timestamp());
        match reply {
            PlaybackReply::Ok(response) => {
                info!(node = %self.config.node_id, reply = %response.message, "[ch-03] playback acknowledged");
                Ok(response)
            }
            PlaybackReply::Error(e) => Err(ProtocolError::Rejected(e.message).into()),
        }
    }

    async fn call_coordinator(
        &self,
        request: &CoordinatorRequest,
        timeout: std::time::Duration,
    ) -> Result<CoordinatorReply, ParticipantError> {
        let reply: CoordinatorReply =
            shared_transport::request(&self.config.coordinator_addr, request, timeout)
                .await
                .inspect_err(|e| {
                    warn!(
                        node = %self.config.node_id,
                        coordinator = %self.config.coordinator_addr,
                        error = %e,
                        "[ch-03] coordinator call failed"
                    );
                })?;
        self.clock.observe(reply.timestamp());
        Ok(reply)
    }
}

fn unexpected(expected: &'static str, reply: CoordinatorReply) -> ParticipantError {
    match reply {
        CoordinatorReply::Error(e) => ProtocolError::Rejected(e.message).into(),
        other => ProtocolError::UnexpectedReply {
            expected,
            got: other.status_name(),
        }
        .into(),
    }
}
