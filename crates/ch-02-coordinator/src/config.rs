//! # Coordinator Configuration

use serde::{Deserialize, Serialize};
use shared_transport::PROTOCOL_TIMEOUT;
use shared_types::NodeId;
use std::time::Duration;

/// Default coordinator listen address.
pub const DEFAULT_COORDINATOR_ADDR: &str = "127.0.0.1:5002";

/// Coordinator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Clock owner id.
    pub node_id: NodeId,

    /// Address the TCP front end binds.
    pub listen_addr: String,

    /// Max wait for one participant's vote.
    pub prepare_timeout: Duration,

    /// Max wait for one participant's COMMIT/ABORT acknowledgement.
    pub decision_timeout: Duration,

    /// Max wait for one participant's status query reply.
    pub status_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            node_id: NodeId::from("COORDINATOR"),
            listen_addr: DEFAULT_COORDINATOR_ADDR.to_string(),
            prepare_timeout: PROTOCOL_TIMEOUT,
            decision_timeout: PROTOCOL_TIMEOUT,
            status_timeout: PROTOCOL_TIMEOUT,
        }
    }
}

impl CoordinatorConfig {
    /// Config for tests: ephemeral port, short timeouts.
    pub fn for_testing() -> Self {
        Self {
            listen_addr: "127.0.0.1:0".to_string(),
            prepare_timeout: Duration::from_millis(500),
            decision_timeout: Duration::from_millis(500),
            status_timeout: Duration::from_millis(500),
            ..Self::default()
        }
    }
}
