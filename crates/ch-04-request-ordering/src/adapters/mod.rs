//! # Adapters

pub mod logging_device;

pub use logging_device::LoggingPlaybackDevice;
