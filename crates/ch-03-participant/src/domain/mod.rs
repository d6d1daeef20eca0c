//! # Domain Module
//!
//! Playlists, ledger entries, staged changes and errors.

pub mod errors;
pub mod ledger;
pub mod playlist;

pub use errors::*;
pub use ledger::*;
pub use playlist::*;
