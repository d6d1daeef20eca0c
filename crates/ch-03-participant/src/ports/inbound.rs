//! # Inbound Ports
//!
//! What a participant offers to the coordinator.

use ch_01_logical_clock::LogicalClock;
use shared_bus::ArtistUpdate;
use shared_types::{Operation, OperationCode, SongId, TransactionId, VoteRecord};

/// Committed playlist summary returned by a status query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    /// Applied commits.
    pub version: u64,
    /// Hex SHA3-256 of the ordered ids.
    pub digest: String,
    /// Song count.
    pub len: usize,
}

/// Participant API - inbound port driven by coordinator messages.
///
/// Clock handling (observe on receive, tick on reply) is the caller's job.
pub trait ParticipantApi: Send + Sync {
    /// The participant's clock.
    fn clock(&self) -> &LogicalClock;

    /// Validate against the committed playlist, stage, and vote.
    fn prepare(&self, transaction_id: TransactionId, operation: OperationCode, song_id: SongId) -> VoteRecord;

    /// Promote staged state. No-op without staged state.
    fn commit(&self, transaction_id: &TransactionId, operation: Operation, song_id: &SongId);

    /// Drop staged state. No-op without staged state.
    fn abort(&self, transaction_id: &TransactionId);

    /// Summarise the committed playlist.
    fn status(&self) -> PlaylistSummary;
}

/// Receives artist updates forwarded by a notification listener.
pub trait NotificationSink: Send + Sync {
    /// Fold one update into local state.
    fn on_artist_update(&self, update: ArtistUpdate);
}
