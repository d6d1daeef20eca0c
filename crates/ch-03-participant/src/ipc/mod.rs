//! # IPC Module
//!
//! Wire front end: decodes [`shared_types::ParticipantRequest`] frames sent
//! by the coordinator and answers with [`shared_types::ParticipantReply`].

pub mod handler;
pub mod server;

pub use handler::ParticipantHandler;
pub use server::ParticipantServer;
