//! # Playback Ordering
//!
//! Clients with independent clocks send playback requests to one ordered
//! request server; the server's log ends up sorted by `(counter, node_id)`
//! whatever the arrival order.

#[cfg(test)]
mod tests {
    use crate::fixtures::request_server;
    use ch_01_logical_clock::LogicalClock;
    use ch_03_participant::{InMemoryLedgerStore, ParticipantAgent, ParticipantApi, ParticipantConfig};
    use shared_types::{LogicalTimestamp, NodeId, PlaybackReply, PlaybackRequest};
    use std::time::Duration;

    fn agent(id: &str, server: &str) -> ParticipantAgent<InMemoryLedgerStore> {
        let config = ParticipantConfig {
            server_addr: server.to_string(),
            ..ParticipantConfig::for_node(id)
        };
        ParticipantAgent::new(config, InMemoryLedgerStore::new())
    }

    #[tokio::test]
    async fn test_out_of_order_arrivals_are_logged_sorted() {
        let (server, addr) = request_server(64).await.unwrap();
        let addr = addr.to_string();

        for (counter, node) in [(3, "B"), (1, "A"), (2, "C")] {
            let reply: PlaybackReply = shared_transport::request(
                &addr,
                &PlaybackRequest::new(format!("song from {node}"), LogicalTimestamp::new(counter, node)),
                Duration::from_secs(2),
            )
            .await
            .unwrap();
            match reply {
                PlaybackReply::Ok(r) => assert_eq!(r.message, format!("Playing song: song from {node}")),
                PlaybackReply::Error(e) => panic!("rejected: {}", e.message),
            }
        }

        let order: Vec<_> = server
            .pending()
            .into_iter()
            .map(|r| (r.timestamp.counter, r.timestamp.node_id))
            .collect();
        assert_eq!(
            order,
            vec![(1, NodeId::from("A")), (2, NodeId::from("C")), (3, NodeId::from("B"))]
        );

        server.stop().await;
    }

    #[tokio::test]
    async fn test_agents_request_playback_and_advance_clocks() {
        let (server, addr) = request_server(64).await.unwrap();
        let addr = addr.to_string();
        let one = agent("CLIENT_1", &addr);
        let two = agent("CLIENT_2", &addr);

        let first = one.request_playback("Golden").await.unwrap();
        let second = two.request_playback("Soda Pop").await.unwrap();

        assert_eq!(first.message, "Playing song: Golden");
        assert_eq!(first.timestamp.node_id, NodeId::from("SERVER"));
        assert!(second.timestamp > first.timestamp);
        assert!(one.clock().snapshot().counter > first.timestamp.counter);

        let log = server.pending();
        assert_eq!(log.len(), 2);
        assert!(log[0].timestamp <= log[1].timestamp);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_concurrent_requests_all_logged_in_order() {
        let (server, addr) = request_server(64).await.unwrap();
        let addr = addr.to_string();

        let clocks: Vec<_> = (0..5)
            .map(|i| LogicalClock::starting_at(format!("N{i}"), 10 - i as u64 * 2))
            .collect();
        let requests = clocks.iter().map(|clock| {
            let addr = addr.clone();
            let request = PlaybackRequest::new(format!("from {}", clock.owner()), clock.tick());
            async move {
                shared_transport::request::<_, PlaybackReply>(&addr, &request, Duration::from_secs(2)).await
            }
        });
        let replies = futures::future::join_all(requests).await;
        assert!(replies.iter().all(|r| matches!(r, Ok(PlaybackReply::Ok(_)))));

        let log = server.pending();
        assert_eq!(log.len(), 5);
        assert!(log.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(log[0].timestamp.node_id, NodeId::from("N4"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_full_log_drops_oldest() {
        let (server, addr) = request_server(2).await.unwrap();
        let addr = addr.to_string();

        for counter in [5, 1, 9] {
            let _: PlaybackReply = shared_transport::request(
                &addr,
                &PlaybackRequest::new("loop", LogicalTimestamp::new(counter, "A")),
                Duration::from_secs(2),
            )
            .await
            .unwrap();
        }

        let counters: Vec<_> = server.pending().iter().map(|r| r.timestamp.counter).collect();
        assert_eq!(counters, vec![5, 9]);

        server.stop().await;
    }
}
