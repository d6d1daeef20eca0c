//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration for one node.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Node identifier, if known at init time
    pub node_id: Option<String>,

    /// Log level filter directive (`info`, `ch_02_coordinator=debug`, ...)
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON instead of human-readable lines
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "chorus".to_string(),
            node_id: None,
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CH_SERVICE_NAME`: Service name (default: chorus)
    /// - `CH_NODE_ID`: Node id (default: unset)
    /// - `CH_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: info)
    /// - `CH_CONSOLE_OUTPUT`: Enable stdout output (default: true)
    /// - `CH_JSON_LOGS`: JSON output (default: false, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("CH_SERVICE_NAME").unwrap_or_else(|_| "chorus".to_string()),

            node_id: env::var("CH_NODE_ID").ok().filter(|v| !v.is_empty()),

            log_level: env::var("CH_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("CH_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v).unwrap_or(true))
                .unwrap_or(true),

            json_logs: env::var("CH_JSON_LOGS")
                .map(|v| parse_flag(&v).unwrap_or(false))
                .unwrap_or(is_container),
        }
    }

    /// Configuration for a named role on a node.
    pub fn for_node(node_id: &str) -> Self {
        let mut config = Self::from_env();
        config.node_id = Some(node_id.to_string());
        config
    }

    /// Service name including the node id.
    pub fn full_service_name(&self) -> String {
        match &self.node_id {
            Some(id) => format!("{}-{}", self.service_name, id.to_lowercase()),
            None => self.service_name.clone(),
        }
    }
}

/// `true`/`1`/`yes`/`on` and their negatives, case-insensitive.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
