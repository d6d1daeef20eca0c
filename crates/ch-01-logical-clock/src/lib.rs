//! # CH-01 Logical Clock
//!
//! Per-node Lamport clock that every other Chorus component stamps its
//! messages with.
//!
//! **Subsystem ID:** 1
//!
//! ## Rules
//!
//! | Event | Operation | Counter after |
//! |-------|-----------|---------------|
//! | send | [`LogicalClock::tick`] | `counter + 1` |
//! | receive | [`LogicalClock::observe`] | `max(counter, received) + 1` |
//! | inspect | [`LogicalClock::snapshot`] | unchanged |
//!
//! Timestamps are `(counter, node_id)` pairs; the `node_id` tie-break turns
//! the causal partial order into one total order shared by all nodes.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod clock;

pub use clock::LogicalClock;
pub use shared_types::{LogicalTimestamp, NodeId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
