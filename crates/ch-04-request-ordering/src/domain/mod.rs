//! # Domain Module
//!
//! Queued requests, the sorted pending log and errors.

pub mod entities;
pub mod errors;
pub mod pending;

pub use entities::*;
pub use errors::*;
pub use pending::*;
