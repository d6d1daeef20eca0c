//! # CH-02 Coordinator
//!
//! Two-phase commit coordinator keeping every participant's playlist in
//! lock-step.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (domain + ports/adapters)
//!
//! ## Protocol
//!
//! ```text
//!            ┌──── PREPARE ────→ participant₁ ── yes/no ──┐
//! request ──→│──── PREPARE ────→ participant₂ ── yes/no ──│──→ decide
//!            └──── PREPARE ────→ participantₙ ── yes/no ──┘       │
//!                                                                 ▼
//!                           COMMIT (all yes) / ABORT (any no) to everyone
//! ```
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Commit iff every contacted participant voted yes | `application/service.rs` `decide()` |
//! | Timeout, refused connection or bad reply counts as no | `collect_votes()` |
//! | No participants aborts without network traffic | `begin_transaction()` |
//! | Decisions are final; Phase-2 failures are recorded, not undone | `TransactionRecord::undelivered` |
//! | One transaction in Phase 1 at a time | FIFO gate in `CoordinatorService` |
//!
//! ## Module Structure
//!
//! ```text
//! ch-02-coordinator/
//! ├── domain/       # TransactionRecord, TransactionLog, ParticipantRegistry, errors
//! ├── ports/        # CoordinatorApi (inbound), ParticipantClient (outbound)
//! ├── adapters/     # TCP participant client
//! ├── application/  # CoordinatorService
//! ├── ipc/          # wire handler and TCP server
//! └── config.rs     # CoordinatorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

pub use adapters::TcpParticipantClient;
pub use application::CoordinatorService;
pub use config::CoordinatorConfig;
pub use domain::{
    ConsistencyReport, CoordinatorError, ParticipantAddress, ParticipantRegistration,
    ParticipantRegistry, PlaylistFingerprint, TransactionLog, TransactionRecord,
};
pub use ipc::{CoordinatorHandler, CoordinatorServer};
pub use ports::{CoordinatorApi, ParticipantClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
