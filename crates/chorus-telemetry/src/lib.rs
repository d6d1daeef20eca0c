//! # Chorus Telemetry
//!
//! Logging setup shared by every Chorus binary: an [`EnvFilter`] plus either
//! human-readable or JSON lines on stdout.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chorus_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CH_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `CH_JSON_LOGS` | `false` | JSON output |
//! | `CH_SERVICE_NAME` | `chorus` | Service name in logs |
//! | `CH_NODE_ID` | unset | Appended to the service name |
//!
//! [`EnvFilter`]: tracing_subscriber::EnvFilter

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directive did not parse.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber was already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install logging for this process.
///
/// Returns a guard to hold for the lifetime of the application; dropping it
/// logs the shutdown.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;
    Ok(TelemetryGuard {
        service: config.full_service_name(),
    })
}

/// Guard that marks telemetry as active.
pub struct TelemetryGuard {
    service: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service, "Shutting down telemetry...");
    }
}

/// Convenience macro for creating a span with subsystem context.
///
/// ```rust,ignore
/// let _span = chorus_telemetry::subsystem_span!("prepare", subsystem = "ch-03", node = %id).entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
