//! # Chorus Node Runtime
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging
//! 3. Start the request server and coordinator if enabled
//! 4. Start the participant listener and register with the coordinator
//! 5. Follow favourite artists and publish the startup announcements
//! 6. Wait for Ctrl+C, then stop everything in reverse order

use anyhow::{Context, Result};
use chorus_telemetry::{init_telemetry, TelemetryConfig};
use node_runtime::{NodeConfig, NodeRuntime};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Failed to load node configuration")?;
    let _telemetry = init_telemetry(TelemetryConfig::for_node(config.node_id.as_str()))
        .context("Failed to initialize logging")?;

    let runtime = NodeRuntime::new(config);
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
