//! Subscriber installation.
//!
//! JSON lines carry `timestamp`, `level`, `target`, the message and every
//! structured field, so `[ch-02] transaction committed` with
//! `transaction_id = txn_4` can be filtered on either.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
pub(crate) fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Filter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        (true, false) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(true),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service = %config.full_service_name(),
        level = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_txn_event {
    ($level:ident, $subsystem:expr, $msg:expr, $txn_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            transaction_id = %$txn_id,
            $($($field)*,)?
            $msg
        )
    };
}
