//! # Domain Entities
//!
//! Transaction records, participant registrations and audit results.

use crate::domain::errors::CoordinatorError;
use serde::{Deserialize, Serialize};
use shared_types::{
    AbortReason, LogicalTimestamp, NodeId, Operation, SongId, TransactionId, TransactionState,
    VoteRecord,
};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// PARTICIPANTS
// =============================================================================

/// Where a participant's handler listens.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantAddress {
    /// Host name or IP.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ParticipantAddress {
    /// Create an address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ParticipantAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One registry entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRegistration {
    /// Participant's node id.
    pub client_id: NodeId,
    /// Participant's listener.
    pub address: ParticipantAddress,
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// One attempt at a playlist mutation. Append-only; never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// `txn_<n>`.
    pub transaction_id: TransactionId,
    /// Requested mutation.
    pub operation: Operation,
    /// Song affected.
    pub song_id: SongId,
    /// Client that asked for it.
    pub initiator: NodeId,
    /// Current state.
    pub state: TransactionState,
    /// Coordinator clock when the record was created.
    pub started_at: LogicalTimestamp,
    /// Phase-1 votes.
    pub votes: BTreeMap<NodeId, VoteRecord>,
    /// Why it aborted, if it did.
    pub abort_reason: Option<AbortReason>,
    /// Coordinator clock at the decision.
    pub decided_at: Option<LogicalTimestamp>,
    /// Participants that did not acknowledge the Phase-2 message.
    pub undelivered: Vec<NodeId>,
}

impl TransactionRecord {
    /// A fresh record in `Preparing`.
    pub fn new(
        transaction_id: TransactionId,
        operation: Operation,
        song_id: SongId,
        initiator: NodeId,
        started_at: LogicalTimestamp,
    ) -> Self {
        Self {
            transaction_id,
            operation,
            song_id,
            initiator,
            state: TransactionState::Preparing,
            started_at,
            votes: BTreeMap::new(),
            abort_reason: None,
            decided_at: None,
            undelivered: Vec::new(),
        }
    }

    /// Record a commit decision.
    pub fn commit(
        &mut self,
        votes: BTreeMap<NodeId, VoteRecord>,
        at: LogicalTimestamp,
    ) -> Result<(), CoordinatorError> {
        self.transition(TransactionState::Committed)?;
        self.votes = votes;
        self.decided_at = Some(at);
        Ok(())
    }

    /// Record an abort decision.
    pub fn abort(
        &mut self,
        reason: AbortReason,
        votes: BTreeMap<NodeId, VoteRecord>,
        at: LogicalTimestamp,
    ) -> Result<(), CoordinatorError> {
        self.transition(TransactionState::Aborted)?;
        self.abort_reason = Some(reason);
        self.votes = votes;
        self.decided_at = Some(at);
        Ok(())
    }

    /// Check if the decision has been taken.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.state.is_terminal()
    }

    fn transition(&mut self, to: TransactionState) -> Result<(), CoordinatorError> {
        if !self.state.can_transition_to(to) {
            return Err(CoordinatorError::InvalidTransition {
                id: self.transaction_id.clone(),
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

// =============================================================================
// CONSISTENCY AUDIT
// =============================================================================

/// `(version, digest, len)` of a participant's committed playlist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaylistFingerprint {
    /// Number of commits applied.
    pub version: u64,
    /// Hex SHA3-256 over the ordered song ids.
    pub digest: String,
    /// Number of songs.
    pub len: usize,
}

/// Result of probing every registered participant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Fingerprints of participants that answered.
    pub fingerprints: BTreeMap<NodeId, PlaylistFingerprint>,
    /// Participants whose fingerprint differs from the most common one.
    pub divergent: Vec<NodeId>,
    /// Participants that did not answer.
    pub unreachable: Vec<NodeId>,
}

impl ConsistencyReport {
    /// Build a report, marking everyone outside the majority fingerprint as
    /// divergent. Ties go to the fingerprint with the highest version.
    pub fn from_statuses(
        fingerprints: BTreeMap<NodeId, PlaylistFingerprint>,
        unreachable: Vec<NodeId>,
    ) -> Self {
        let mut counts: BTreeMap<(u64, &str), usize> = BTreeMap::new();
        for fp in fingerprints.values() {
            *counts.entry((fp.version, fp.digest.as_str())).or_insert(0) += 1;
        }
        let reference = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)))
            .map(|(key, _)| (key.0, key.1.to_string()));

        let divergent = match reference {
            Some((version, digest)) => fingerprints
                .iter()
                .filter(|(_, fp)| fp.version != version || fp.digest != digest)
                .map(|(id, _)| id.clone())
                .collect(),
            None => Vec::new(),
        };

        Self {
            fingerprints,
            divergent,
            unreachable,
        }
    }

    /// Check if every participant answered with the same fingerprint.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.divergent.is_empty() && self.unreachable.is_empty()
    }
}
