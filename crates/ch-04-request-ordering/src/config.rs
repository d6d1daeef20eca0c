//! # Ordering Configuration

use serde::{Deserialize, Serialize};
use shared_types::NodeId;

/// Default address of the ordered request server.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:5001";

/// Ordered request server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderingConfig {
    /// Clock owner id.
    pub node_id: NodeId,

    /// Address to bind.
    pub listen_addr: String,

    /// Entries kept in the pending log; the oldest are evicted past this.
    pub max_pending: usize,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            node_id: NodeId::from("SERVER"),
            listen_addr: DEFAULT_SERVER_ADDR.to_string(),
            max_pending: 1024,
        }
    }
}

impl OrderingConfig {
    /// Ephemeral port and a small log.
    pub fn for_testing() -> Self {
        Self {
            listen_addr: "127.0.0.1:0".to_string(),
            max_pending: 8,
            ..Self::default()
        }
    }
}
