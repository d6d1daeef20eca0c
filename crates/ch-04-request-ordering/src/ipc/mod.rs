//! # IPC Module
//!
//! Wire front end: decodes [`shared_types::PlaybackRequest`] frames and
//! answers with [`shared_types::PlaybackReply`].

pub mod handler;
pub mod server;

pub use handler::OrderingHandler;
pub use server::OrderedRequestServer;
