//! # Integration Tests
//!
//! Every test binds its own ephemeral ports, so they run in parallel.

pub mod clocks;
pub mod notifications;
pub mod playback_ordering;
pub mod runtime;
pub mod two_phase_commit;
