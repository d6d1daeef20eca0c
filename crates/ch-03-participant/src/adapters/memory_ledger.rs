//! # In-Memory Ledger
//!
//! [`LedgerStore`] kept in process memory; lost on restart.

use crate::domain::{LedgerEntry, ParticipantError};
use crate::ports::LedgerStore;
use parking_lot::RwLock;
use shared_types::{TransactionId, TransactionState};

/// Vec-backed ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl InMemoryLedgerStore {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-loaded with entries, e.g. left over from a previous run.
    #[must_use]
    pub fn with_entries(entries: Vec<LedgerEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn upsert(&self, entry: LedgerEntry) -> Result<(), ParticipantError> {
        let mut entries = self.entries.write();
        match entries
            .iter_mut()
            .find(|e| e.transaction_id == entry.transaction_id)
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }

    fn set_state(&self, id: &TransactionId, state: TransactionState) -> Result<(), ParticipantError> {
        let mut entries = self.entries.write();
        let entry = entries
            .iter_mut()
            .find(|e| &e.transaction_id == id)
            .ok_or_else(|| ParticipantError::UnknownTransaction(id.clone()))?;
        entry.state = state;
        Ok(())
    }

    fn get(&self, id: &TransactionId) -> Option<LedgerEntry> {
        self.entries
            .read()
            .iter()
            .find(|e| &e.transaction_id == id)
            .cloned()
    }

    fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.read().clone()
    }
}
