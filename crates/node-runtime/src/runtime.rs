//! # Node Runtime
//!
//! Owns every role running on this node and starts/stops them in order.

use crate::config::NodeConfig;
use anyhow::{Context, Result};
use ch_01_logical_clock::LogicalClock;
use ch_02_coordinator::{CoordinatorServer, CoordinatorService, TcpParticipantClient};
use ch_03_participant::{
    InMemoryLedgerStore, NotificationFeed, ParticipantAgent, ParticipantServer,
};
use ch_04_request_ordering::{LoggingPlaybackDevice, OrderedRequestServer, OrderingService};
use parking_lot::Mutex;
use shared_bus::{ArtistPublisher, EventPublisher, InMemoryEventBus};
use shared_types::NodeId;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Artist updates every node publishes once it is up.
pub const STARTUP_ANNOUNCEMENTS: [(&str, &str); 3] = [
    ("Taylor Swift", "New album 'Midnights' released!"),
    ("Sorry Ghost", "New single 'Echo' out now!"),
    ("HUNTRX", "World tour announced for 2025!"),
];

/// Coordinator as wired in a node.
pub type NodeCoordinator = CoordinatorServer<CoordinatorService<TcpParticipantClient>>;
/// Participant agent as wired in a node.
pub type NodeAgent = ParticipantAgent<InMemoryLedgerStore>;
/// Request server as wired in a node.
pub type NodeRequestServer = OrderedRequestServer<OrderingService<LoggingPlaybackDevice>>;

/// Every role of one node.
pub struct NodeRuntime {
    config: NodeConfig,
    bus: Arc<InMemoryEventBus>,
    request_server: Option<NodeRequestServer>,
    coordinator: Option<NodeCoordinator>,
    coordinator_service: Option<Arc<CoordinatorService<TcpParticipantClient>>>,
    agent: Arc<NodeAgent>,
    participant: ParticipantServer<NodeAgent>,
    feed: Mutex<Option<NotificationFeed>>,
}

impl NodeRuntime {
    /// Create a node with its own artist bus.
    pub fn new(config: NodeConfig) -> Self {
        Self::with_bus(config, Arc::new(InMemoryEventBus::new()))
    }

    /// Create a node attached to an existing artist bus, e.g. one shared by
    /// several nodes in the same process.
    pub fn with_bus(config: NodeConfig, bus: Arc<InMemoryEventBus>) -> Self {
        info!(node = %config.node_id, "Creating Chorus node runtime");

        let request_server = config.run_server.then(|| {
            let service = Arc::new(OrderingService::new(
                config.ordering_config(),
                LoggingPlaybackDevice::new(),
            ));
            OrderedRequestServer::new(service, config.server_addr.clone())
        });

        let coordinator_service = config.run_coordinator.then(|| {
            Arc::new(CoordinatorService::new(
                config.coordinator_config(),
                Arc::new(TcpParticipantClient::new()),
            ))
        });
        let coordinator = coordinator_service
            .as_ref()
            .map(|svc| CoordinatorServer::new(Arc::clone(svc), config.coordinator_addr.clone()));

        let agent = Arc::new(ParticipantAgent::new(
            config.participant_config(),
            InMemoryLedgerStore::new(),
        ));
        let participant = ParticipantServer::new(Arc::clone(&agent), config.participant_addr.clone());

        Self {
            config,
            bus,
            request_server,
            coordinator,
            coordinator_service,
            agent,
            participant,
            feed: Mutex::new(None),
        }
    }

    /// Start every enabled role, register with the coordinator and follow
    /// the configured artists.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Chorus Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("  Node: {}", self.config.node_id);
        info!("===========================================");

        if let Some(server) = &self.request_server {
            let addr = server
                .start()
                .await
                .context("Failed to start request server")?;
            info!(%addr, "[ch-04] role enabled");
        }
        if let Some(coordinator) = &self.coordinator {
            let addr = coordinator
                .start()
                .await
                .context("Failed to start coordinator")?;
            info!(%addr, "[ch-02] role enabled");
        }

        let addr = self
            .participant
            .start()
            .await
            .context("Failed to start participant listener")?;
        self.register(addr).await?;

        if !self.config.favorite_artists.is_empty() {
            let feed = self.agent.follow_artists(self.bus.as_ref());
            *self.feed.lock() = Some(feed);
        }
        if self.config.announce_on_start {
            self.announce().await;
        }

        info!(node = %self.config.node_id, "All roles running");
        Ok(())
    }

    async fn register(&self, addr: SocketAddr) -> Result<()> {
        let attempts = self.config.register_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.agent.register_with(addr.port()).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < attempts => {
                    warn!(attempt, error = %e, "Coordinator not ready, retrying registration");
                    attempt += 1;
                    tokio::time::sleep(self.config.register_backoff).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!(
                            "Failed to register with coordinator at {}",
                            self.config.coordinator_addr
                        )
                    })
                }
            }
        }
    }

    async fn announce(&self) {
        let publisher = ArtistPublisher::new(self.bus.clone(), self.agent.clock_handle());
        for (artist, message) in STARTUP_ANNOUNCEMENTS {
            let receivers = publisher.publish_artist_message(artist, message).await;
            debug!(artist, receivers, "Startup announcement published");
        }
    }

    /// Stop every role. Deregistration failures are logged, not returned.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Some(feed) = self.feed.lock().take() {
            feed.stop();
        }
        if self.participant.local_addr().is_some() {
            if let Err(e) = self.agent.deregister().await {
                warn!(error = %e, "Deregistration failed");
            }
        }
        self.participant.stop().await;
        if let Some(coordinator) = &self.coordinator {
            coordinator.stop().await;
        }
        if let Some(server) = &self.request_server {
            server.stop().await;
        }

        info!("Shutdown complete");
    }

    /// This node's id.
    pub fn node_id(&self) -> &NodeId {
        &self.config.node_id
    }

    /// The participant agent.
    pub fn agent(&self) -> Arc<NodeAgent> {
        Arc::clone(&self.agent)
    }

    /// The coordinator service, when this node runs one.
    pub fn coordinator(&self) -> Option<Arc<CoordinatorService<TcpParticipantClient>>> {
        self.coordinator_service.as_ref().map(Arc::clone)
    }

    /// The request server, when this node runs one.
    pub fn request_server(&self) -> Option<&NodeRequestServer> {
        self.request_server.as_ref()
    }

    /// The artist bus this node listens on.
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    /// A publisher for artist updates on this node's bus, stamping with a
    /// clock owned by `publisher_id`.
    pub fn artist_publisher(&self, publisher_id: &str) -> ArtistPublisher {
        let bus: Arc<dyn EventPublisher> = self.bus.clone();
        ArtistPublisher::new(bus, Arc::new(LogicalClock::new(publisher_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::SongId;

    fn solo_config() -> NodeConfig {
        NodeConfig {
            coordinator_addr: "127.0.0.1:0".into(),
            server_addr: "127.0.0.1:0".into(),
            register_attempts: 1,
            ..NodeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_participant_only_node_fails_without_coordinator() {
        let config = NodeConfig {
            run_coordinator: false,
            run_server: false,
            coordinator_addr: "127.0.0.1:1".into(),
            ..solo_config()
        };
        let runtime = NodeRuntime::new(config);
        let err = runtime.start().await.unwrap_err();
        assert!(err.to_string().contains("Failed to register"));
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_primary_node_hears_its_startup_announcements() {
        let coordinator = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .to_string();
        let config = NodeConfig {
            coordinator_addr: coordinator,
            favorite_artists: vec!["HUNTRX".into()],
            ..solo_config()
        };
        let runtime = NodeRuntime::new(config);
        runtime.start().await.unwrap();

        let agent = runtime.agent();
        for _ in 0..200 {
            if agent.latest_update("HUNTRX").is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let update = agent.latest_update("HUNTRX").unwrap();
        assert_eq!(update.message, "World tour announced for 2025!");
        assert_eq!(update.node_id, *runtime.node_id());
        assert!(agent.latest_update("Taylor Swift").is_none());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_roles_are_optional() {
        let config = NodeConfig {
            run_coordinator: false,
            run_server: false,
            ..solo_config()
        };
        let runtime = NodeRuntime::new(config);
        assert!(runtime.coordinator().is_none());
        assert!(runtime.request_server().is_none());
        assert!(runtime.agent().playlist().is_empty());
        assert!(!runtime.agent().playlist().contains(&SongId::from("x")));
    }
}
