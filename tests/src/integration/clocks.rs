//! # Clock Propagation
//!
//! Lamport rules across real message exchanges: every send ticks, every
//! receive observes, so a reply always orders after its request.

#[cfg(test)]
mod tests {
    use crate::fixtures::Cluster;
    use ch_01_logical_clock::LogicalClock;
    use ch_02_coordinator::CoordinatorApi;
    use ch_03_participant::ParticipantApi;
    use shared_types::{LogicalTimestamp, SongId, Stamped, TransactionResult};

    #[test]
    fn test_message_exchange_between_two_clocks() {
        let a = LogicalClock::starting_at("A", 4);
        let b = LogicalClock::starting_at("B", 2);

        let sent = a.tick();
        assert_eq!(sent, LogicalTimestamp::new(5, "A"));

        let received = b.observe(&sent);
        assert_eq!(received, LogicalTimestamp::new(6, "B"));

        let back = a.observe(&received);
        assert_eq!(back, LogicalTimestamp::new(7, "A"));
    }

    #[tokio::test]
    async fn test_transaction_result_orders_after_request() {
        let cluster = Cluster::start(&["A", "B"]).await.unwrap();
        let a = cluster.agent("A").unwrap();
        let b = cluster.agent("B").unwrap();

        let before = a.clock().snapshot();
        let result = a.request_add(SongId::from("tick")).await.unwrap();
        let after = a.clock().snapshot();

        // request tick, coordinator stamps, initiator observes
        assert!(result.timestamp().counter > before.counter + 1);
        assert!(after.counter > result.timestamp().counter);

        // B saw PREPARE and COMMIT from the coordinator
        assert!(b.clock().snapshot().counter >= 4);
        assert!(cluster.coordinator.clock().snapshot().counter >= result.timestamp().counter);

        cluster.shutdown().await;
    }

    #[tokio::test]
    async fn test_decision_stamp_is_recorded() {
        let cluster = Cluster::start(&["A"]).await.unwrap();
        let a = cluster.agent("A").unwrap();

        let result = a.request_add(SongId::from("x")).await.unwrap();
        let record = cluster
            .coordinator
            .transaction(result.transaction_id())
            .unwrap();

        assert!(record.started_at < *result.timestamp());
        assert_eq!(record.decided_at.as_ref(), Some(result.timestamp()));
        assert!(matches!(result, TransactionResult::Committed { .. }));

        cluster.shutdown().await;
    }
}
