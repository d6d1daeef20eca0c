//! # Adapters
//!
//! Ledger storage and notification plumbing.

pub mod memory_ledger;
pub mod notifications;

pub use memory_ledger::InMemoryLedgerStore;
pub use notifications::NotificationFeed;
