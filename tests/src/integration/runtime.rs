//! # Node Runtime
//!
//! Whole nodes wired from `NodeConfig`: a primary node hosting the
//! coordinator and request server, plus participant-only nodes.

#[cfg(test)]
mod tests {
    use ch_02_coordinator::CoordinatorApi;
    use ch_03_participant::ParticipantApi;
    use node_runtime::{NodeConfig, NodeRuntime};
    use shared_bus::InMemoryEventBus;
    use shared_types::{NodeId, SongId};
    use std::sync::Arc;
    use std::time::Duration;

    /// A loopback address whose port was free a moment ago.
    fn free_addr() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    }

    fn node(id: &str, primary: bool, coordinator: &str, server: &str) -> NodeConfig {
        NodeConfig {
            node_id: NodeId::from(id),
            run_coordinator: primary,
            run_server: primary,
            coordinator_addr: coordinator.to_string(),
            server_addr: server.to_string(),
            favorite_artists: vec!["HUNTRX".into()],
            announce_on_start: false,
            register_attempts: 3,
            register_backoff: Duration::from_millis(50),
            ..NodeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_two_nodes_share_playlist_and_server() {
        let coordinator = free_addr();
        let server = free_addr();
        let bus = Arc::new(InMemoryEventBus::new());

        let primary = NodeRuntime::with_bus(node("CLIENT_1", true, &coordinator, &server), bus.clone());
        primary.start().await.unwrap();
        let secondary = NodeRuntime::with_bus(node("CLIENT_2", false, &coordinator, &server), bus.clone());
        secondary.start().await.unwrap();

        let registry = primary.coordinator().unwrap();
        assert_eq!(registry.participants().len(), 2);

        let result = secondary.agent().request_add(SongId::from("Golden")).await.unwrap();
        assert!(result.is_committed());
        assert_eq!(primary.agent().status(), secondary.agent().status());

        let reply = secondary.agent().request_playback("Golden").await.unwrap();
        assert_eq!(reply.message, "Playing song: Golden");
        assert_eq!(primary.request_server().unwrap().pending().len(), 1);

        primary
            .artist_publisher("LABEL")
            .publish_artist_message("HUNTRX", "new single")
            .await;
        for _ in 0..200 {
            if secondary.agent().latest_update("HUNTRX").is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(secondary.agent().latest_update("HUNTRX").unwrap().message, "new single");
        assert!(primary.agent().latest_update("HUNTRX").is_some());

        secondary.shutdown().await;
        assert_eq!(registry.participants().len(), 1);
        primary.shutdown().await;
    }
}
