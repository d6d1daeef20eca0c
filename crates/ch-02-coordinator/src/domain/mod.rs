//! # Domain Module
//!
//! Core coordinator types: transaction records, the log, the registry.

pub mod entities;
pub mod errors;
pub mod log;
pub mod registry;

pub use entities::*;
pub use errors::*;
pub use log::*;
pub use registry::*;
