//! # Application Module
//!
//! The participant agent and the calls it makes on other nodes.

pub mod agent;
pub mod client;

pub use agent::ParticipantAgent;
