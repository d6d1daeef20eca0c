//! # Node Configuration
//!
//! Which roles this node runs and where everything listens, loaded from
//! `CH_*` environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CH_NODE_ID` | `CLIENT_1` |
//! | `CH_ROLE_COORDINATOR` | `true` for `CLIENT_1`, else `false` |
//! | `CH_ROLE_SERVER` | `true` for `CLIENT_1`, else `false` |
//! | `CH_COORDINATOR_ADDR` | `127.0.0.1:5002` |
//! | `CH_SERVER_ADDR` | `127.0.0.1:5001` |
//! | `CH_PARTICIPANT_ADDR` | `127.0.0.1:0` |
//! | `CH_FAVORITE_ARTISTS` | empty (comma separated) |
//! | `CH_ANNOUNCE_ON_START` | `true` |

use ch_02_coordinator::CoordinatorConfig;
use ch_03_participant::ParticipantConfig;
use ch_04_request_ordering::OrderingConfig;
use shared_types::NodeId;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Node that hosts the shared roles unless told otherwise.
pub const PRIMARY_NODE: &str = "CLIENT_1";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A boolean variable held something other than true/false/1/0.
    #[error("{key} must be a boolean, got {value:?}")]
    InvalidFlag {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },

    /// An address variable did not parse as `host:port`.
    #[error("{key} must be host:port, got {value:?}")]
    InvalidAddress {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },

    /// The node id was empty.
    #[error("CH_NODE_ID must not be empty")]
    EmptyNodeId,
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// This node's id; also the participant's clock owner.
    pub node_id: NodeId,
    /// Run the 2PC coordinator here.
    pub run_coordinator: bool,
    /// Run the ordered request server here.
    pub run_server: bool,
    /// Coordinator address (bound when `run_coordinator`).
    pub coordinator_addr: String,
    /// Request server address (bound when `run_server`).
    pub server_addr: String,
    /// Participant listener address; port 0 picks a free port.
    pub participant_addr: String,
    /// Artists to follow on the notification bus.
    pub favorite_artists: Vec<String>,
    /// Publish the startup artist announcements once the node is up.
    pub announce_on_start: bool,
    /// Registration attempts before giving up.
    pub register_attempts: u32,
    /// Pause between registration attempts.
    pub register_backoff: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: NodeId::from(PRIMARY_NODE),
            run_coordinator: true,
            run_server: true,
            coordinator_addr: ch_02_coordinator::config::DEFAULT_COORDINATOR_ADDR.to_string(),
            server_addr: ch_04_request_ordering::config::DEFAULT_SERVER_ADDR.to_string(),
            participant_addr: "127.0.0.1:0".to_string(),
            favorite_artists: Vec::new(),
            announce_on_start: true,
            register_attempts: 10,
            register_backoff: Duration::from_millis(500),
        }
    }
}

impl NodeConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(id) = lookup("CH_NODE_ID") {
            let id = id.trim();
            if id.is_empty() {
                return Err(ConfigError::EmptyNodeId);
            }
            config.node_id = NodeId::from(id);
        }
        let primary = config.node_id.as_str() == PRIMARY_NODE;

        config.run_coordinator = flag(&lookup, "CH_ROLE_COORDINATOR")?.unwrap_or(primary);
        config.run_server = flag(&lookup, "CH_ROLE_SERVER")?.unwrap_or(primary);
        if let Some(announce) = flag(&lookup, "CH_ANNOUNCE_ON_START")? {
            config.announce_on_start = announce;
        }

        if let Some(addr) = address(&lookup, "CH_COORDINATOR_ADDR")? {
            config.coordinator_addr = addr;
        }
        if let Some(addr) = address(&lookup, "CH_SERVER_ADDR")? {
            config.server_addr = addr;
        }
        if let Some(addr) = address(&lookup, "CH_PARTICIPANT_ADDR")? {
            config.participant_addr = addr;
        }
        if let Some(list) = lookup("CH_FAVORITE_ARTISTS") {
            config.favorite_artists = list
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }

    /// Coordinator settings for this node.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            listen_addr: self.coordinator_addr.clone(),
            ..CoordinatorConfig::default()
        }
    }

    /// Request server settings for this node.
    pub fn ordering_config(&self) -> OrderingConfig {
        OrderingConfig {
            listen_addr: self.server_addr.clone(),
            ..OrderingConfig::default()
        }
    }

    /// Participant settings for this node. The advertised host is taken
    /// from the participant listen address.
    pub fn participant_config(&self) -> ParticipantConfig {
        let advertise_host = self
            .participant_addr
            .parse::<SocketAddr>()
            .map(|a| a.ip().to_string())
            .unwrap_or_else(|_| "127.0.0.1".to_string());
        ParticipantConfig {
            node_id: self.node_id.clone(),
            listen_addr: self.participant_addr.clone(),
            advertise_host,
            coordinator_addr: self.coordinator_addr.clone(),
            server_addr: self.server_addr.clone(),
            favorite_artists: self.favorite_artists.clone(),
            ..ParticipantConfig::default()
        }
    }
}

fn flag<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}

fn address<F>(lookup: &F, key: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = value.trim();
    match trimmed.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
            Ok(Some(trimmed.to_string()))
        }
        _ => Err(ConfigError::InvalidAddress { key, value }),
    }
}
