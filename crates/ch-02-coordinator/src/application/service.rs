//! # Coordinator Service
//!
//! Runs two-phase commits against the registered participants.

use crate::config::CoordinatorConfig;
use crate::domain::{
    ConsistencyReport, ParticipantAddress, ParticipantRegistration, ParticipantRegistry,
    PlaylistFingerprint, TransactionLog, TransactionRecord,
};
use crate::ports::{CoordinatorApi, ParticipantClient};
use async_trait::async_trait;
use ch_01_logical_clock::LogicalClock;
use parking_lot::RwLock;
use shared_types::{
    AbortReason, AbortRequest, CommitRequest, NodeId, Operation, ParticipantReply,
    ParticipantRequest, PrepareRequest, SongId, Stamped, StatusQuery, TransactionId,
    TransactionResult, VoteReason, VoteRecord,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Coordinator Service - orchestrates the two-phase commit.
///
/// The pipeline for one transaction:
/// 1. Wait for the FIFO gate
/// 2. Allocate an id and log a `Preparing` record
/// 3. PREPARE every registered participant concurrently
/// 4. Decide: commit iff every vote is yes
/// 5. COMMIT/ABORT every participant asked in step 3
pub struct CoordinatorService<C: ParticipantClient> {
    config: CoordinatorConfig,
    clock: Arc<LogicalClock>,
    client: Arc<C>,
    registry: RwLock<ParticipantRegistry>,
    log: RwLock<TransactionLog>,
    /// Serialises transactions; tokio's mutex queues waiters in order.
    gate: Mutex<()>,
}

impl<C: ParticipantClient + 'static> CoordinatorService<C> {
    /// Create a service with its own clock.
    pub fn new(config: CoordinatorConfig, client: Arc<C>) -> Self {
        let clock = Arc::new(LogicalClock::new(config.node_id.clone()));
        Self::with_clock(config, client, clock)
    }

    /// Create a service around an existing clock.
    pub fn with_clock(config: CoordinatorConfig, client: Arc<C>, clock: Arc<LogicalClock>) -> Self {
        Self {
            config,
            clock,
            client,
            registry: RwLock::new(ParticipantRegistry::new()),
            log: RwLock::new(TransactionLog::new()),
            gate: Mutex::new(()),
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Shared handle to the clock.
    pub fn clock_handle(&self) -> Arc<LogicalClock> {
        Arc::clone(&self.clock)
    }

    /// Phase 1: PREPARE everyone concurrently and gather one vote each.
    ///
    /// A participant that fails to answer, answers late or answers with
    /// anything but a vote is recorded as `no/unreachable`.
    async fn collect_votes(
        &self,
        transaction_id: &TransactionId,
        operation: Operation,
        song_id: &SongId,
        participants: &[ParticipantRegistration],
    ) -> BTreeMap<NodeId, VoteRecord> {
        let mut calls = JoinSet::new();
        for participant in participants {
            let request = ParticipantRequest::Prepare(PrepareRequest {
                transaction_id: transaction_id.clone(),
                operation: operation.into(),
                song_id: song_id.clone(),
                timestamp: self.clock.tick(),
            });
            self.spawn_call(&mut calls, participant, request, self.config.prepare_timeout);
        }

        let mut votes = BTreeMap::new();
        while let Some(joined) = calls.join_next().await {
            let (node, reply) = match joined {
                Ok(result) => result,
                Err(e) => {
                    error!(error = %e, "[ch-02] prepare task failed");
                    continue;
                }
            };
            let vote = match reply {
                Ok(ParticipantReply::Voted(v)) => {
                    self.clock.observe(&v.timestamp);
                    v.record()
                }
                Ok(other) => {
                    self.clock.observe(other.timestamp());
                    warn!(
                        %transaction_id,
                        participant = %node,
                        "[ch-02] unexpected reply to PREPARE, counting as no"
                    );
                    VoteRecord::no(VoteReason::Unreachable)
                }
                Err(e) => {
                    warn!(
                        %transaction_id,
                        participant = %node,
                        error = %e,
                        "[ch-02] no vote received, counting as no"
                    );
                    VoteRecord::no(VoteReason::Unreachable)
                }
            };
            debug!(%transaction_id, participant = %node, vote = ?vote, "[ch-02] vote");
            votes.insert(node, vote);
        }

        // A panicked call task leaves no entry; it still counts as no.
        for participant in participants {
            votes
                .entry(participant.client_id.clone())
                .or_insert_with(|| VoteRecord::no(VoteReason::Unreachable));
        }
        votes
    }

    /// Phase 2: send the decision to everyone. Returns who did not ack.
    async fn broadcast_decision(
        &self,
        transaction_id: &TransactionId,
        commit: bool,
        operation: Operation,
        song_id: &SongId,
        participants: &[ParticipantRegistration],
    ) -> Vec<NodeId> {
        let mut calls = JoinSet::new();
        for participant in participants {
            let timestamp = self.clock.tick();
            let request = if commit {
                ParticipantRequest::Commit(CommitRequest {
                    transaction_id: transaction_id.clone(),
                    operation,
                    song_id: song_id.clone(),
                    timestamp,
                })
            } else {
                ParticipantRequest::Abort(AbortRequest {
                    transaction_id: transaction_id.clone(),
                    timestamp,
                })
            };
            self.spawn_call(&mut calls, participant, request, self.config.decision_timeout);
        }

        let mut acked = Vec::new();
        while let Some(joined) = calls.join_next().await {
            let Ok((node, reply)) = joined else {
                continue;
            };
            match reply {
                Ok(reply @ (ParticipantReply::Committed { .. } | ParticipantReply::Aborted { .. })) => {
                    self.clock.observe(reply.timestamp());
                    acked.push(node);
                }
                Ok(other) => {
                    self.clock.observe(other.timestamp());
                    warn!(%transaction_id, participant = %node, "[ch-02] unexpected reply to decision");
                }
                Err(e) => {
                    warn!(
                        %transaction_id,
                        participant = %node,
                        error = %e,
                        "[ch-02] decision not delivered"
                    );
                }
            }
        }

        participants
            .iter()
            .map(|p| p.client_id.clone())
            .filter(|id| !acked.contains(id))
            .collect()
    }

    fn spawn_call(
        &self,
        calls: &mut JoinSet<(NodeId, Result<ParticipantReply, crate::domain::CoordinatorError>)>,
        participant: &ParticipantRegistration,
        request: ParticipantRequest,
        timeout: Duration,
    ) {
        let client = Arc::clone(&self.client);
        let node = participant.client_id.clone();
        let address = participant.address.clone();
        calls.spawn(async move {
            let reply = match tokio::time::timeout(timeout, client.send(&address, request, timeout)).await {
                Ok(reply) => reply,
                Err(_) => Err(shared_transport::TransportError::Timeout(timeout).into()),
            };
            (node, reply)
        });
    }

    fn finish_abort(
        &self,
        transaction_id: TransactionId,
        reason: AbortReason,
        votes: BTreeMap<NodeId, VoteRecord>,
    ) -> TransactionResult {
        let decided_at = self.clock.tick();
        if let Err(e) = self
            .log
            .write()
            .get_mut(&transaction_id)
            .and_then(|r| r.abort(reason, votes.clone(), decided_at.clone()))
        {
            error!(%transaction_id, error = %e, "[ch-02] failed to record abort");
        }
        TransactionResult::Aborted {
            transaction_id,
            reason,
            votes,
            timestamp: decided_at,
        }
    }
}

#[async_trait]
impl<C: ParticipantClient + 'static> CoordinatorApi for CoordinatorService<C> {
    fn clock(&self) -> &LogicalClock {
        &self.clock
    }

    fn register(&self, client_id: NodeId, address: ParticipantAddress) {
        info!(participant = %client_id, %address, "[ch-02] participant registered");
        self.registry.write().register(client_id, address);
    }

    fn deregister(&self, client_id: &NodeId) -> bool {
        let existed = self.registry.write().deregister(client_id);
        info!(participant = %client_id, existed, "[ch-02] participant deregistered");
        existed
    }

    async fn begin_transaction(
        &self,
        initiator: NodeId,
        operation: Operation,
        song_id: SongId,
    ) -> TransactionResult {
        let _turn = self.gate.lock().await;

        let started_at = self.clock.tick();
        let transaction_id =
            self.log
                .write()
                .begin(operation, song_id.clone(), initiator.clone(), started_at.clone());
        let participants = self.registry.read().snapshot();

        info!(
            %transaction_id,
            %initiator,
            %operation,
            %song_id,
            %started_at,
            participants = participants.len(),
            "[ch-02] transaction started"
        );

        if participants.is_empty() {
            info!(%transaction_id, "[ch-02] aborted: no participants");
            return self.finish_abort(transaction_id, AbortReason::NoParticipants, BTreeMap::new());
        }

        let votes = self
            .collect_votes(&transaction_id, operation, &song_id, &participants)
            .await;
        let commit = votes.values().all(VoteRecord::is_yes);

        // The decision is logged before anyone hears about it.
        let result = if commit {
            let decided_at = self.clock.tick();
            if let Err(e) = self
                .log
                .write()
                .get_mut(&transaction_id)
                .and_then(|r| r.commit(votes, decided_at.clone()))
            {
                error!(%transaction_id, error = %e, "[ch-02] failed to record commit");
            }
            info!(%transaction_id, %decided_at, "[ch-02] committed");
            TransactionResult::Committed {
                transaction_id: transaction_id.clone(),
                participants: participants.iter().map(|p| p.client_id.clone()).collect(),
                timestamp: decided_at,
            }
        } else {
            let no_votes = votes.values().filter(|v| !v.is_yes()).count();
            info!(%transaction_id, no_votes, "[ch-02] aborted: voted no");
            self.finish_abort(transaction_id.clone(), AbortReason::VotedNo, votes)
        };

        let undelivered = self
            .broadcast_decision(&transaction_id, commit, operation, &song_id, &participants)
            .await;

        if !undelivered.is_empty() {
            warn!(
                %transaction_id,
                undelivered = ?undelivered,
                "[ch-02] decision missed by some participants"
            );
            if let Ok(record) = self.log.write().get_mut(&transaction_id) {
                record.undelivered = undelivered;
            }
        }
        result
    }

    fn transactions(&self) -> Vec<TransactionRecord> {
        self.log.read().snapshot()
    }

    fn transaction(&self, id: &TransactionId) -> Option<TransactionRecord> {
        self.log.read().get(id).cloned()
    }

    fn participants(&self) -> Vec<ParticipantRegistration> {
        self.registry.read().snapshot()
    }

    async fn audit_consistency(&self) -> ConsistencyReport {
        let _turn = self.gate.lock().await;
        let participants = self.registry.read().snapshot();

        let mut calls = JoinSet::new();
        for participant in &participants {
            let request = ParticipantRequest::Status(StatusQuery {
                timestamp: self.clock.tick(),
            });
            self.spawn_call(&mut calls, participant, request, self.config.status_timeout);
        }

        let mut fingerprints = BTreeMap::new();
        while let Some(joined) = calls.join_next().await {
            let Ok((node, reply)) = joined else {
                continue;
            };
            match reply {
                Ok(ParticipantReply::Playlist(status)) => {
                    self.clock.observe(&status.timestamp);
                    fingerprints.insert(
                        node,
                        PlaylistFingerprint {
                            version: status.version,
                            digest: status.digest,
                            len: status.len,
                        },
                    );
                }
                Ok(other) => {
                    self.clock.observe(other.timestamp());
                }
                Err(e) => debug!(participant = %node, error = %e, "[ch-02] status query failed"),
            }
        }

        let unreachable = participants
            .iter()
            .map(|p| p.client_id.clone())
            .filter(|id| !fingerprints.contains_key(id))
            .collect();
        let report = ConsistencyReport::from_statuses(fingerprints, unreachable);

        if report.is_consistent() {
            info!(participants = participants.len(), "[ch-02] playlists consistent");
        } else {
            warn!(
                divergent = ?report.divergent,
                unreachable = ?report.unreachable,
                "[ch-02] playlist divergence detected"
            );
        }
        report
    }
}
