//! # Test Fixtures
//!
//! A coordinator and any number of registered participants, all on
//! loopback with ephemeral ports.

use anyhow::{anyhow, Context, Result};
use ch_02_coordinator::{
    CoordinatorConfig, CoordinatorServer, CoordinatorService, TcpParticipantClient,
};
use ch_03_participant::{
    InMemoryLedgerStore, ParticipantAgent, ParticipantConfig, ParticipantServer, Playlist,
};
use ch_04_request_ordering::{
    LoggingPlaybackDevice, OrderedRequestServer, OrderingConfig, OrderingService,
};
use shared_types::SongId;
use std::net::SocketAddr;
use std::sync::Arc;

/// Agent type used throughout the suite.
pub type Agent = ParticipantAgent<InMemoryLedgerStore>;

/// Coordinator service type used throughout the suite.
pub type Coordinator = CoordinatorService<TcpParticipantClient>;

/// Request server type used throughout the suite.
pub type RequestServer = OrderedRequestServer<OrderingService<LoggingPlaybackDevice>>;

/// One participant node.
pub struct ClusterNode {
    /// The agent.
    pub agent: Arc<Agent>,
    /// Its listener.
    pub server: ParticipantServer<Agent>,
    /// Bound listener address.
    pub addr: SocketAddr,
}

/// A running coordinator plus participants.
pub struct Cluster {
    /// The coordinator service, for direct inspection.
    pub coordinator: Arc<Coordinator>,
    coordinator_server: CoordinatorServer<Coordinator>,
    /// Bound coordinator address.
    pub coordinator_addr: SocketAddr,
    /// Participants in registration order.
    pub nodes: Vec<ClusterNode>,
}

impl Cluster {
    /// Coordinator plus one empty-playlist participant per id.
    pub async fn start(ids: &[&str]) -> Result<Self> {
        let nodes: Vec<(&str, &[&str])> = ids.iter().map(|id| (*id, &[][..])).collect();
        Self::start_with_playlists(&nodes).await
    }

    /// Coordinator plus participants pre-filled with songs.
    pub async fn start_with_playlists(nodes: &[(&str, &[&str])]) -> Result<Self> {
        let coordinator = Arc::new(CoordinatorService::new(
            CoordinatorConfig::for_testing(),
            Arc::new(TcpParticipantClient::new()),
        ));
        let coordinator_server = CoordinatorServer::new(Arc::clone(&coordinator), "127.0.0.1:0");
        let coordinator_addr = coordinator_server
            .start()
            .await
            .context("coordinator failed to start")?;

        let mut cluster = Self {
            coordinator,
            coordinator_server,
            coordinator_addr,
            nodes: Vec::new(),
        };
        for (id, songs) in nodes {
            cluster.join(id, songs).await?;
        }
        Ok(cluster)
    }

    /// Start another participant and register it.
    pub async fn join(&mut self, id: &str, songs: &[&str]) -> Result<&ClusterNode> {
        let agent = Arc::new(self.unregistered_agent(id, songs));
        let server = ParticipantServer::new(Arc::clone(&agent), "127.0.0.1:0");
        let addr = server.start().await.context("participant failed to start")?;
        agent
            .register_with(addr.port())
            .await
            .with_context(|| format!("{id} failed to register"))?;
        self.nodes.push(ClusterNode {
            agent,
            server,
            addr,
        });
        self.nodes.last().ok_or_else(|| anyhow!("node list empty after push"))
    }

    /// An agent that knows the coordinator but is not registered.
    pub fn unregistered_agent(&self, id: &str, songs: &[&str]) -> Agent {
        let config = ParticipantConfig {
            coordinator_addr: self.coordinator_addr.to_string(),
            ..ParticipantConfig::for_node(id)
        };
        ParticipantAgent::with_playlist(
            config,
            InMemoryLedgerStore::new(),
            Playlist::from_songs(songs.iter().map(|s| SongId::from(*s))),
        )
    }

    /// Node by id.
    pub fn node(&self, id: &str) -> Result<&ClusterNode> {
        self.nodes
            .iter()
            .find(|n| n.agent.node_id().as_str() == id)
            .ok_or_else(|| anyhow!("no node {id}"))
    }

    /// Agent by id.
    pub fn agent(&self, id: &str) -> Result<Arc<Agent>> {
        self.node(id).map(|n| Arc::clone(&n.agent))
    }

    /// Stop a participant's listener without deregistering it, as if the
    /// process had died.
    pub async fn crash(&self, id: &str) -> Result<()> {
        self.node(id)?.server.stop().await;
        Ok(())
    }

    /// Stop everything.
    pub async fn shutdown(self) {
        for node in &self.nodes {
            node.server.stop().await;
        }
        self.coordinator_server.stop().await;
    }
}

/// A running request server with a logging device.
pub async fn request_server(max_pending: usize) -> Result<(RequestServer, SocketAddr)> {
    let config = OrderingConfig {
        max_pending,
        ..OrderingConfig::for_testing()
    };
    let service = Arc::new(OrderingService::new(config, LoggingPlaybackDevice::new()));
    let server = OrderedRequestServer::new(service, "127.0.0.1:0");
    let addr = server.start().await.context("request server failed to start")?;
    Ok((server, addr))
}
