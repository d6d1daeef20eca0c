//! # CH-04 Request Ordering
//!
//! Ordered playback-request server. Each request is logged by its Lamport
//! timestamp and serviced on arrival.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (domain + ports/adapters)
//!
//! ## Request path
//!
//! ```text
//! PlaybackRequest{song,(n,node)} ─→ observe ─→ insert sorted ─→ device.play ─→ tick ─→ reply
//! ```
//!
//! The log is best-effort causal: a request stamped earlier than one
//! already serviced is placed before it in the log but is not replayed.
//!
//! ## Module Structure
//!
//! ```text
//! ch-04-request-ordering/
//! ├── domain/       # QueuedRequest, Track, PendingLog, errors
//! ├── ports/        # OrderingApi (inbound), PlaybackDevice (outbound)
//! ├── adapters/     # logging playback device
//! ├── application/  # OrderingService
//! ├── ipc/          # wire handler and OrderedRequestServer
//! └── config.rs     # OrderingConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

pub use adapters::LoggingPlaybackDevice;
pub use application::OrderingService;
pub use config::OrderingConfig;
pub use domain::{OrderingError, PendingLog, QueuedRequest, Track};
pub use ipc::{OrderedRequestServer, OrderingHandler};
pub use ports::{OrderingApi, PlaybackDevice};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
