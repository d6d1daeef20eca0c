//! # Transaction Log
//!
//! Append-only list of [`TransactionRecord`]s with monotonically assigned
//! ids.

use crate::domain::entities::TransactionRecord;
use crate::domain::errors::CoordinatorError;
use shared_types::{LogicalTimestamp, NodeId, Operation, SongId, TransactionId};

/// All transaction attempts, oldest first.
#[derive(Debug, Default, Clone)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
    last_sequence: u64,
}

impl TransactionLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id and append a `Preparing` record.
    pub fn begin(
        &mut self,
        operation: Operation,
        song_id: SongId,
        initiator: NodeId,
        started_at: LogicalTimestamp,
    ) -> TransactionId {
        self.last_sequence += 1;
        let id = TransactionId::from_sequence(self.last_sequence);
        self.records.push(TransactionRecord::new(
            id.clone(),
            operation,
            song_id,
            initiator,
            started_at,
        ));
        id
    }

    /// Look up a record.
    #[must_use]
    pub fn get(&self, id: &TransactionId) -> Option<&TransactionRecord> {
        self.records.iter().rev().find(|r| &r.transaction_id == id)
    }

    /// Look up a record for update.
    pub fn get_mut(&mut self, id: &TransactionId) -> Result<&mut TransactionRecord, CoordinatorError> {
        self.records
            .iter_mut()
            .rev()
            .find(|r| &r.transaction_id == id)
            .ok_or_else(|| CoordinatorError::TransactionNotFound(id.clone()))
    }

    /// Copy of every record.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        self.records.clone()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
