//! # Node Runtime Library
//!
//! Configuration and wiring for one Chorus node. The main entry point is the
//! `main.rs` binary; the library is exposed for the end-to-end tests.
//!
//! ## Roles
//!
//! ```text
//!                 ┌──────────────── node ────────────────┐
//!                 │ OrderedRequestServer   (optional)    │
//!                 │ CoordinatorServer      (optional)    │
//!                 │ ParticipantAgent + ParticipantServer │
//!                 │ NotificationFeed ← artist bus        │
//!                 └──────────────────────────────────────┘
//! ```
//!
//! Each role keeps its own Lamport clock under its own id (`SERVER`,
//! `COORDINATOR`, the node id), so the timestamps it issues stay distinct.

#![warn(missing_docs)]

pub mod config;
pub mod runtime;

pub use config::{ConfigError, NodeConfig};
pub use runtime::NodeRuntime;
