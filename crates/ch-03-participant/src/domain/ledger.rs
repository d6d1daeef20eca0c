//! # Ledger Entries
//!
//! Per-transaction record kept by a participant, plus the staged playlist
//! that PREPARE produces.

use crate::domain::playlist::Playlist;
use serde::{Deserialize, Serialize};
use shared_types::{LogicalTimestamp, Operation, OperationCode, SongId, TransactionId, TransactionState};

/// What this participant knows about one transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Transaction the entry belongs to.
    pub transaction_id: TransactionId,
    /// `Preparing` until COMMIT/ABORT arrives (or recovery resolves it).
    pub state: TransactionState,
    /// Operation as received.
    pub operation: OperationCode,
    /// Song affected.
    pub song_id: SongId,
    /// Local clock when PREPARE was handled.
    pub timestamp: LogicalTimestamp,
}

impl LedgerEntry {
    /// A fresh `Preparing` entry.
    pub fn preparing(
        transaction_id: TransactionId,
        operation: OperationCode,
        song_id: SongId,
        timestamp: LogicalTimestamp,
    ) -> Self {
        Self {
            transaction_id,
            state: TransactionState::Preparing,
            operation,
            song_id,
            timestamp,
        }
    }
}

/// Scratch copy taken at PREPARE, promoted at COMMIT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TentativeChange {
    /// Mutation that was validated.
    pub operation: Operation,
    /// Song affected.
    pub song_id: SongId,
    /// Committed version the copy was taken from.
    pub base_version: u64,
    /// Committed playlist with the mutation applied.
    pub staged: Playlist,
}

impl TentativeChange {
    /// Stage `operation` against a copy of `committed`.
    pub fn stage(committed: &Playlist, operation: Operation, song_id: SongId) -> Self {
        let mut staged = committed.clone();
        staged.apply(operation, &song_id);
        Self {
            operation,
            song_id,
            base_version: committed.version(),
            staged,
        }
    }

    /// Produce the new committed playlist.
    ///
    /// If `current` moved on since staging, the operation is replayed onto
    /// it rather than overwriting it with the stale copy.
    pub fn promote(self, current: &Playlist) -> Playlist {
        let mut next = if current.version() == self.base_version {
            self.staged
        } else {
            let mut replayed = current.clone();
            replayed.apply(self.operation, &self.song_id);
            replayed
        };
        next.bump_version();
        next
    }
}
