//! # Shared Transport - Request/Response over TCP
//!
//! The substrate every Chorus protocol runs on: one connection carries
//! exactly one request frame and one reply frame.
//!
//! ```text
//! ┌────────────┐   [u32 LE len][JSON request]   ┌────────────┐
//! │  request() │ ─────────────────────────────→ │ FrameServer│
//! │            │ ←───────────────────────────── │  handler   │
//! └────────────┘   [u32 LE len][JSON reply]     └────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Bounded waits:** every client exchange runs under one deadline; every
//!   server-side read runs under `read_timeout`.
//! - **Partial reads:** frames are read with `read_exact`, so a split TCP
//!   segment never yields a truncated message.
//! - **Explicit rejection:** undecodable requests get the handler's
//!   rejection reply instead of a silent close.
//! - **Idempotent stop:** [`FrameServer::stop`] unblocks the accept loop and
//!   may be called any number of times.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod client;
pub mod error;
pub mod framing;
pub mod server;

pub use client::request;
pub use error::TransportError;
pub use framing::{read_frame, write_frame, MAX_FRAME_LEN};
pub use server::{FrameHandler, FrameServer, ServerConfig};

/// Timeout for a single protocol message exchange.
pub const PROTOCOL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Timeout for an end-to-end transaction initiated by a client.
pub const TRANSACTION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
