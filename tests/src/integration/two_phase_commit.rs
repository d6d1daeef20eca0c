//! # Two-Phase Commit over Loopback
//!
//! Real coordinator, real participants, real sockets.
//!
//! ## Flows Tested
//!
//! 1. Single participant add commits
//! 2. Duplicate at one participant aborts everywhere
//! 3. No participants aborts without network traffic
//! 4. Unreachable participant counts as an implicit no
//! 5. Concurrent transactions keep replicas identical
//! 6. Deregistered participants stop voting

#[cfg(test)]
mod tests {
    use crate::fixtures::Cluster;
    use ch_02_coordinator::CoordinatorApi;
    use ch_03_participant::ParticipantApi;
    use shared_types::{
        AbortReason, NodeId, Operation, SongId, TransactionResult, TransactionState, Vote,
        VoteReason,
    };

    fn song(s: &str) -> SongId {
        SongId::from(s)
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_single_participant_add_commits() {
        let cluster = Cluster::start(&["CLIENT_1"]).await.unwrap();
        let agent = cluster.agent("CLIENT_1").unwrap();

        let result = agent.request_add(song("song7")).await.unwrap();

        assert!(result.is_committed());
        assert!(agent.playlist().contains(&song("song7")));
        assert_eq!(agent.playlist().version(), 1);

        let record = cluster
            .coordinator
            .transaction(result.transaction_id())
            .unwrap();
        assert_eq!(record.state, TransactionState::Committed);
        assert!(record.undelivered.is_empty());

        let entry = agent.ledger_entry(result.transaction_id()).unwrap();
        assert_eq!(entry.state, TransactionState::Committed);

        cluster.shutdown().await;
    }

    #[tokio::test]
    async fn test_duplicate_at_one_participant_aborts_everywhere() {
        let cluster = Cluster::start_with_playlists(&[("X", &["song3"]), ("Y", &[])])
            .await
            .unwrap();
        let x = cluster.agent("X").unwrap();
        let y = cluster.agent("Y").unwrap();
        let before = (x.status(), y.status());

        let result = y.request_add(song("song3")).await.unwrap();

        match &result {
            TransactionResult::Aborted { reason, votes, .. } => {
                assert_eq!(*reason, AbortReason::VotedNo);
                assert_eq!(votes.len(), 2);
                let x_vote = &votes[&NodeId::from("X")];
                assert_eq!(x_vote.vote, Vote::No);
                assert_eq!(x_vote.reason, Some(VoteReason::Duplicate));
                assert!(votes[&NodeId::from("Y")].is_yes());
            }
            other => panic!("expected abort, got {other:?}"),
        }
        assert_eq!(result.no_votes(), 1);
        assert_eq!((x.status(), y.status()), before);

        // both ledgers resolved to aborted, Y's staged copy discarded
        for agent in [&x, &y] {
            let entry = agent.ledger_entry(result.transaction_id()).unwrap();
            assert_eq!(entry.state, TransactionState::Aborted);
            assert!(agent.staged_transactions().is_empty());
        }

        cluster.shutdown().await;
    }

    #[tokio::test]
    async fn test_no_participants_aborts_immediately() {
        let cluster = Cluster::start(&[]).await.unwrap();
        let outsider = cluster.unregistered_agent("LONER", &[]);

        let result = outsider.request_add(song("song1")).await.unwrap();

        match result {
            TransactionResult::Aborted { reason, votes, .. } => {
                assert_eq!(reason, AbortReason::NoParticipants);
                assert!(votes.is_empty());
            }
            other => panic!("expected abort, got {other:?}"),
        }
        assert!(outsider.playlist().is_empty());

        cluster.shutdown().await;
    }

    #[tokio::test]
    async fn test_remove_of_missing_song_aborts_with_not_found() {
        let cluster = Cluster::start_with_playlists(&[("A", &["s1"]), ("B", &[])])
            .await
            .unwrap();
        let a = cluster.agent("A").unwrap();

        let result = a.request_remove(song("s1")).await.unwrap();

        match result {
            TransactionResult::Aborted { votes, .. } => {
                assert_eq!(votes[&NodeId::from("B")].reason, Some(VoteReason::NotFound));
            }
            other => panic!("expected abort, got {other:?}"),
        }
        assert!(a.playlist().contains(&song("s1")));

        cluster.shutdown().await;
    }

    // =============================================================================
    // FAILURES
    // =============================================================================

    #[tokio::test]
    async fn test_crashed_participant_is_implicit_no() {
        let cluster = Cluster::start(&["A", "B", "C"]).await.unwrap();
        cluster.crash("C").await.unwrap();
        let a = cluster.agent("A").unwrap();

        let result = a.request_add(song("song9")).await.unwrap();

        match &result {
            TransactionResult::Aborted { reason, votes, .. } => {
                assert_eq!(*reason, AbortReason::VotedNo);
                assert_eq!(
                    votes[&NodeId::from("C")].reason,
                    Some(VoteReason::Unreachable)
                );
            }
            other => panic!("expected abort, got {other:?}"),
        }

        // atomicity: every reachable participant aborted, none applied
        for id in ["A", "B"] {
            let agent = cluster.agent(id).unwrap();
            assert!(agent.playlist().is_empty());
            assert_eq!(
                agent.ledger_entry(result.transaction_id()).unwrap().state,
                TransactionState::Aborted
            );
        }

        cluster.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_operation_rejected_by_coordinator() {
        let cluster = Cluster::start(&["A"]).await.unwrap();

        let reply: shared_types::CoordinatorReply = shared_transport::request(
            &cluster.coordinator_addr.to_string(),
            &transaction_with_operation("shuffle"),
            std::time::Duration::from_secs(2),
        )
        .await
        .unwrap();

        assert_eq!(reply.status_name(), "error");
        assert!(cluster.coordinator.transactions().is_empty());

        cluster.shutdown().await;
    }

    /// Transaction request with an arbitrary operation string.
    fn transaction_with_operation(operation: &str) -> shared_types::CoordinatorRequest {
        shared_types::CoordinatorRequest::Transaction(shared_types::TransactionRequest {
            client_id: NodeId::from("A"),
            operation: shared_types::OperationCode::Unknown(operation.to_string()),
            song_id: song("x"),
            timestamp: shared_types::LogicalTimestamp::new(1, "A"),
        })
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test]
    async fn test_concurrent_transactions_keep_replicas_identical() {
        let cluster = Cluster::start(&["A", "B", "C"]).await.unwrap();
        let agents: Vec<_> = ["A", "B", "C"]
            .iter()
            .map(|id| cluster.agent(id).unwrap())
            .collect();

        let requests = agents.iter().enumerate().flat_map(|(i, agent)| {
            (0..3).map(move |n| {
                let agent = agent.clone();
                async move { agent.request_add(SongId::new(format!("s{i}-{n}"))).await }
            })
        });
        let results = futures::future::join_all(requests).await;
        assert!(results.iter().all(|r| r.as_ref().unwrap().is_committed()));

        let reference = agents[0].status();
        assert_eq!(reference.len, 9);
        assert_eq!(reference.version, 9);
        for agent in &agents[1..] {
            assert_eq!(agent.status(), reference);
        }

        let report = cluster.coordinator.audit_consistency().await;
        assert!(report.is_consistent());

        cluster.shutdown().await;
    }

    #[tokio::test]
    async fn test_conflicting_adds_commit_exactly_once() {
        let cluster = Cluster::start(&["A", "B"]).await.unwrap();
        let a = cluster.agent("A").unwrap();
        let b = cluster.agent("B").unwrap();

        let (ra, rb) = tokio::join!(a.request_add(song("hit")), b.request_add(song("hit")));
        let committed = [ra.unwrap(), rb.unwrap()]
            .iter()
            .filter(|r| r.is_committed())
            .count();

        assert_eq!(committed, 1);
        assert_eq!(a.playlist().len(), 1);
        assert_eq!(b.status(), a.status());

        cluster.shutdown().await;
    }

    // =============================================================================
    // MEMBERSHIP AND AUDIT
    // =============================================================================

    #[tokio::test]
    async fn test_deregistered_participant_no_longer_votes() {
        let cluster = Cluster::start(&["A", "B"]).await.unwrap();
        let a = cluster.agent("A").unwrap();
        let b = cluster.agent("B").unwrap();

        b.deregister().await.unwrap();
        assert_eq!(cluster.coordinator.participants().len(), 1);

        let result = a.request_add(song("solo")).await.unwrap();
        match result {
            TransactionResult::Committed { participants, .. } => {
                assert_eq!(participants, vec![NodeId::from("A")]);
            }
            other => panic!("expected commit, got {other:?}"),
        }
        assert!(b.playlist().is_empty());

        cluster.shutdown().await;
    }

    #[tokio::test]
    async fn test_audit_reports_divergent_replica() {
        let mut cluster = Cluster::start(&["A", "B"]).await.unwrap();
        cluster.join("LATE", &["stale"]).await.unwrap();

        let report = cluster.coordinator.audit_consistency().await;
        assert!(!report.is_consistent());
        assert_eq!(report.divergent, vec![NodeId::from("LATE")]);

        cluster.crash("B").await.unwrap();
        let report = cluster.coordinator.audit_consistency().await;
        assert_eq!(report.unreachable, vec![NodeId::from("B")]);

        cluster.shutdown().await;
    }

    #[tokio::test]
    async fn test_direct_begin_transaction_uses_registry_snapshot() {
        let cluster = Cluster::start(&["A"]).await.unwrap();

        let result = cluster
            .coordinator
            .begin_transaction(NodeId::from("OPS"), Operation::Add, song("direct"))
            .await;

        assert!(result.is_committed());
        assert!(cluster
            .agent("A")
            .unwrap()
            .playlist()
            .contains(&song("direct")));

        cluster.shutdown().await;
    }
}
