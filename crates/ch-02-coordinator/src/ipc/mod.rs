//! # IPC Module
//!
//! Wire front end: decodes [`shared_types::CoordinatorRequest`] frames and
//! answers with [`shared_types::CoordinatorReply`].

pub mod handler;
pub mod server;

pub use handler::CoordinatorHandler;
pub use server::CoordinatorServer;
