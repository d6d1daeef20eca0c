//! # Participant Configuration

use serde::{Deserialize, Serialize};
use shared_transport::{PROTOCOL_TIMEOUT, TRANSACTION_TIMEOUT};
use shared_types::NodeId;
use std::time::Duration;

/// Participant configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantConfig {
    /// This client's node id.
    pub node_id: NodeId,

    /// Address the participant handler binds. Port 0 picks a free port.
    pub listen_addr: String,

    /// Host announced to the coordinator on registration.
    pub advertise_host: String,

    /// Coordinator address.
    pub coordinator_addr: String,

    /// Ordered request server address.
    pub server_addr: String,

    /// Max wait for a transaction result.
    pub transaction_timeout: Duration,

    /// Max wait for registration and playback replies.
    pub protocol_timeout: Duration,

    /// Artists whose updates this client follows.
    pub favorite_artists: Vec<String>,

    /// Buffered artist updates between the listener and the agent.
    pub notification_buffer: usize,
}

impl Default for ParticipantConfig {
    fn default() -> Self {
        Self {
            node_id: NodeId::from("CLIENT_1"),
            listen_addr: "127.0.0.1:0".to_string(),
            advertise_host: "127.0.0.1".to_string(),
            coordinator_addr: "127.0.0.1:5002".to_string(),
            server_addr: "127.0.0.1:5001".to_string(),
            transaction_timeout: TRANSACTION_TIMEOUT,
            protocol_timeout: PROTOCOL_TIMEOUT,
            favorite_artists: Vec::new(),
            notification_buffer: 64,
        }
    }
}

impl ParticipantConfig {
    /// Default config for another client id.
    pub fn for_node(node_id: impl Into<NodeId>) -> Self {
        Self {
            node_id: node_id.into(),
            ..Self::default()
        }
    }
}
