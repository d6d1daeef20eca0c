//! # Inbound Ports
//!
//! What the coordinator offers to its front end.

use crate::domain::{ConsistencyReport, ParticipantAddress, ParticipantRegistration, TransactionRecord};
use async_trait::async_trait;
use ch_01_logical_clock::LogicalClock;
use shared_types::{NodeId, Operation, SongId, TransactionId, TransactionResult};

/// Coordinator API - inbound port.
#[async_trait]
pub trait CoordinatorApi: Send + Sync {
    /// The coordinator's clock, shared with the front end for stamping.
    fn clock(&self) -> &LogicalClock;

    /// Add or overwrite a participant. Idempotent.
    fn register(&self, client_id: NodeId, address: ParticipantAddress);

    /// Remove a participant. Returns whether it was registered.
    fn deregister(&self, client_id: &NodeId) -> bool;

    /// Run one two-phase commit to completion.
    ///
    /// Never fails: every participant failure resolves to an abort. The
    /// returned timestamp is a fresh tick, suitable for stamping the reply.
    async fn begin_transaction(
        &self,
        initiator: NodeId,
        operation: Operation,
        song_id: SongId,
    ) -> TransactionResult;

    /// Copy of the transaction log, oldest first.
    fn transactions(&self) -> Vec<TransactionRecord>;

    /// Copy of one record.
    fn transaction(&self, id: &TransactionId) -> Option<TransactionRecord>;

    /// Copy of the registry.
    fn participants(&self) -> Vec<ParticipantRegistration>;

    /// Query every participant and compare committed playlists.
    async fn audit_consistency(&self) -> ConsistencyReport;
}
