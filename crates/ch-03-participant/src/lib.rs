//! # CH-03 Participant
//!
//! The client side of Chorus: holds a local playlist replica, votes in
//! two-phase commit, initiates mutations and playback requests, and follows
//! artist updates.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (domain + ports/adapters)
//!
//! ## Per-transaction lifecycle
//!
//! ```text
//! Idle ──PREPARE(valid)──→ Preparing ──COMMIT──→ Committed
//!   │                          │
//!   └─PREPARE(invalid)─→ vote no  └──ABORT───→ Aborted
//! ```
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Votes are judged against the committed playlist only | `ParticipantAgent::prepare()` |
//! | Staged state is keyed by transaction id | `TentativeChange` map in the agent |
//! | COMMIT/ABORT without staged state are acknowledged no-ops | `commit()` / `abort()` |
//! | `Preparing` ledger entries found at startup become `Aborted` | `ParticipantAgent::new()` |
//! | Every send ticks, every receive observes | `application/client.rs`, `ipc/handler.rs` |
//!
//! ## Module Structure
//!
//! ```text
//! ch-03-participant/
//! ├── domain/       # Playlist, LedgerEntry, TentativeChange, errors
//! ├── ports/        # ParticipantApi, NotificationSink (inbound), LedgerStore (outbound)
//! ├── adapters/     # in-memory ledger, notification feed
//! ├── application/  # ParticipantAgent and its outbound calls
//! ├── ipc/          # wire handler and TCP server
//! └── config.rs     # ParticipantConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

pub use adapters::{InMemoryLedgerStore, NotificationFeed};
pub use application::ParticipantAgent;
pub use config::ParticipantConfig;
pub use domain::{LedgerEntry, ParticipantError, Playlist, TentativeChange};
pub use ipc::{ParticipantHandler, ParticipantServer};
pub use ports::{LedgerStore, NotificationSink, ParticipantApi, PlaylistSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
