//! # Shared Types Crate
//!
//! Identities, logical timestamps, votes, and the wire messages exchanged
//! between Chorus nodes.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every message that crosses a socket is
//!   defined here, as an explicit tagged enum.
//! - **Exhaustive Handling**: receivers match every variant; unknown tags fail
//!   to decode and are answered with an explicit error reply.
//! - **Stamped Messages**: every message carries a [`LogicalTimestamp`].

pub mod entities;
pub mod errors;
pub mod ipc;

pub use entities::*;
pub use errors::*;
pub use ipc::*;
