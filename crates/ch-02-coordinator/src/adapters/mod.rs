//! # Adapters
//!
//! Concrete implementations of outbound ports.

pub mod tcp_participant;

pub use tcp_participant::TcpParticipantClient;
