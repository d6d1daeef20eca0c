//! # Outbound Ports
//!
//! Where a participant keeps its transaction ledger.

use crate::domain::{LedgerEntry, ParticipantError};
use shared_types::{TransactionId, TransactionState};

/// Ledger storage - outbound port.
pub trait LedgerStore: Send + Sync {
    /// Insert, or replace the entry with the same transaction id.
    fn upsert(&self, entry: LedgerEntry) -> Result<(), ParticipantError>;

    /// Change the state of an existing entry.
    fn set_state(&self, id: &TransactionId, state: TransactionState) -> Result<(), ParticipantError>;

    /// Look up one entry.
    fn get(&self, id: &TransactionId) -> Option<LedgerEntry>;

    /// Every entry, oldest first.
    fn entries(&self) -> Vec<LedgerEntry>;
}
