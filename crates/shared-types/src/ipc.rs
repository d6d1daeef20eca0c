//! # Wire Messages
//!
//! Every request/response exchanged between Chorus components. One request
//! and one reply travel per connection; framing lives in `shared-transport`.
//!
//! | Channel | Request enum (tag) | Reply enum (tag) |
//! |---|---|---|
//! | client → coordinator | [`CoordinatorRequest`] (`type`) | [`CoordinatorReply`] (`status`) |
//! | coordinator → participant | [`ParticipantRequest`] (`phase`) | [`ParticipantReply`] (`status`) |
//! | client → request server | [`PlaybackRequest`] | [`PlaybackReply`] (`status`) |

use crate::entities::{
    AbortReason, LogicalTimestamp, NodeId, Operation, OperationCode, SongId, TransactionId, Vote,
    VoteReason, VoteRecord,
};
use crate::errors::ProtocolError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Access to the logical timestamp carried by a message.
pub trait Stamped {
    /// The sender's clock value at send time.
    fn timestamp(&self) -> &LogicalTimestamp;
}

/// Explicit error reply for frames that could not be decoded or handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Human-readable description.
    pub message: String,
    /// Responder's clock.
    pub timestamp: LogicalTimestamp,
}

// ============================================================
// CLIENT → COORDINATOR
// ============================================================

/// A client announcing the address its participant handler listens on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Registering node.
    pub client_id: NodeId,
    /// Host of the participant listener.
    pub host: String,
    /// Port of the participant listener.
    pub port: u16,
    /// Sender's clock.
    pub timestamp: LogicalTimestamp,
}

/// A client leaving the participant set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deregistration {
    /// Leaving node.
    pub client_id: NodeId,
    /// Sender's clock.
    pub timestamp: LogicalTimestamp,
}

/// A client asking the coordinator to run a playlist mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Initiating node.
    pub client_id: NodeId,
    /// Requested mutation.
    pub operation: OperationCode,
    /// Song to add or remove.
    pub song_id: SongId,
    /// Sender's clock.
    pub timestamp: LogicalTimestamp,
}

/// Requests accepted by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoordinatorRequest {
    /// Join (or re-join) the participant set.
    Register(Registration),
    /// Leave the participant set.
    Deregister(Deregistration),
    /// Run a two-phase commit.
    Transaction(TransactionRequest),
}

impl Stamped for CoordinatorRequest {
    fn timestamp(&self) -> &LogicalTimestamp {
        match self {
            Self::Register(r) => &r.timestamp,
            Self::Deregister(d) => &d.timestamp,
            Self::Transaction(t) => &t.timestamp,
        }
    }
}

/// Replies sent by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoordinatorReply {
    /// Registration stored.
    Registered {
        /// Coordinator's clock.
        timestamp: LogicalTimestamp,
    },
    /// Registration removed (or was already absent).
    Deregistered {
        /// Coordinator's clock.
        timestamp: LogicalTimestamp,
    },
    /// Every participant voted yes; COMMIT was broadcast.
    Committed {
        /// Transaction that committed.
        transaction_id: TransactionId,
        /// Participants that took part.
        participants: Vec<NodeId>,
        /// Coordinator's clock.
        timestamp: LogicalTimestamp,
    },
    /// The transaction aborted.
    Aborted {
        /// Transaction that aborted.
        transaction_id: TransactionId,
        /// Why.
        reason: AbortReason,
        /// Per-participant votes (empty for `no_participants`).
        #[serde(default)]
        votes: BTreeMap<NodeId, VoteRecord>,
        /// Coordinator's clock.
        timestamp: LogicalTimestamp,
    },
    /// The request was malformed or could not be handled.
    Error(ErrorReply),
}

impl Stamped for CoordinatorReply {
    fn timestamp(&self) -> &LogicalTimestamp {
        match self {
            Self::Registered { timestamp }
            | Self::Deregistered { timestamp }
            | Self::Committed { timestamp, .. }
            | Self::Aborted { timestamp, .. } => timestamp,
            Self::Error(e) => &e.timestamp,
        }
    }
}

/// Outcome of a transaction as returned to the initiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionResult {
    /// Applied everywhere.
    Committed {
        /// Transaction that committed.
        transaction_id: TransactionId,
        /// Participants that took part.
        participants: Vec<NodeId>,
        /// Coordinator's clock at decision.
        timestamp: LogicalTimestamp,
    },
    /// Applied nowhere.
    Aborted {
        /// Transaction that aborted.
        transaction_id: TransactionId,
        /// Why.
        reason: AbortReason,
        /// Per-participant votes.
        votes: BTreeMap<NodeId, VoteRecord>,
        /// Coordinator's clock at decision.
        timestamp: LogicalTimestamp,
    },
}

impl TransactionResult {
    /// Check if the transaction committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// The transaction identifier.
    #[must_use]
    pub fn transaction_id(&self) -> &TransactionId {
        match self {
            Self::Committed { transaction_id, .. } | Self::Aborted { transaction_id, .. } => {
                transaction_id
            }
        }
    }

    /// Number of `no` votes (explicit or implicit).
    #[must_use]
    pub fn no_votes(&self) -> usize {
        match self {
            Self::Committed { .. } => 0,
            Self::Aborted { votes, .. } => votes.values().filter(|v| !v.is_yes()).count(),
        }
    }
}

impl Stamped for TransactionResult {
    fn timestamp(&self) -> &LogicalTimestamp {
        match self {
            Self::Committed { timestamp, .. } | Self::Aborted { timestamp, .. } => timestamp,
        }
    }
}

impl From<TransactionResult> for CoordinatorReply {
    fn from(result: TransactionResult) -> Self {
        match result {
            TransactionResult::Committed {
                transaction_id,
                participants,
                timestamp,
            } => Self::Committed {
                transaction_id,
                participants,
                timestamp,
            },
            TransactionResult::Aborted {
                transaction_id,
                reason,
                votes,
                timestamp,
            } => Self::Aborted {
                transaction_id,
                reason,
                votes,
                timestamp,
            },
        }
    }
}

impl TryFrom<CoordinatorReply> for TransactionResult {
    type Error = ProtocolError;

    fn try_from(reply: CoordinatorReply) -> Result<Self, Self::Error> {
        match reply {
            CoordinatorReply::Committed {
                transaction_id,
                participants,
                timestamp,
            } => Ok(Self::Committed {
                transaction_id,
                participants,
                timestamp,
            }),
            CoordinatorReply::Aborted {
                transaction_id,
                reason,
                votes,
                timestamp,
            } => Ok(Self::Aborted {
                transaction_id,
                reason,
                votes,
                timestamp,
            }),
            CoordinatorReply::Error(e) => Err(ProtocolError::Rejected(e.message)),
            other => Err(ProtocolError::UnexpectedReply {
                expected: "committed|aborted",
                got: other.status_name(),
            }),
        }
    }
}

impl CoordinatorReply {
    /// The wire `status` tag of this reply.
    #[must_use]
    pub fn status_name(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "registered",
            Self::Deregistered { .. } => "deregistered",
            Self::Committed { .. } => "committed",
            Self::Aborted { .. } => "aborted",
            Self::Error(_) => "error",
        }
    }
}

// ============================================================
// COORDINATOR → PARTICIPANT
// ============================================================

/// Phase 1: ask a participant to validate and stage a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareRequest {
    /// Transaction being prepared.
    pub transaction_id: TransactionId,
    /// Requested mutation, possibly unrecognised.
    pub operation: OperationCode,
    /// Song to add or remove.
    pub song_id: SongId,
    /// Coordinator's clock.
    pub timestamp: LogicalTimestamp,
}

/// Phase 2: apply the staged mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    /// Transaction being committed.
    pub transaction_id: TransactionId,
    /// Mutation that was prepared.
    pub operation: Operation,
    /// Song that was prepared.
    pub song_id: SongId,
    /// Coordinator's clock.
    pub timestamp: LogicalTimestamp,
}

/// Phase 2: discard the staged mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortRequest {
    /// Transaction being aborted.
    pub transaction_id: TransactionId,
    /// Coordinator's clock.
    pub timestamp: LogicalTimestamp,
}

/// Ask a participant for the fingerprint of its committed playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusQuery {
    /// Coordinator's clock.
    pub timestamp: LogicalTimestamp,
}

/// Requests accepted by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ParticipantRequest {
    /// Phase 1.
    Prepare(PrepareRequest),
    /// Phase 2, commit decision.
    Commit(CommitRequest),
    /// Phase 2, abort decision.
    Abort(AbortRequest),
    /// Consistency query.
    Status(StatusQuery),
}

impl Stamped for ParticipantRequest {
    fn timestamp(&self) -> &LogicalTimestamp {
        match self {
            Self::Prepare(p) => &p.timestamp,
            Self::Commit(c) => &c.timestamp,
            Self::Abort(a) => &a.timestamp,
            Self::Status(s) => &s.timestamp,
        }
    }
}

/// A participant's PREPARE answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareReply {
    /// The vote.
    pub vote: Vote,
    /// Reason code for `no`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<VoteReason>,
    /// Participant's clock.
    pub timestamp: LogicalTimestamp,
}

impl PrepareReply {
    /// The vote as the coordinator records it.
    #[must_use]
    pub fn record(&self) -> VoteRecord {
        VoteRecord {
            vote: self.vote,
            reason: self.reason,
        }
    }
}

/// Fingerprint of a participant's committed playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistStatus {
    /// Number of commits applied.
    pub version: u64,
    /// Hex SHA3-256 digest over the ordered song ids.
    pub digest: String,
    /// Number of songs.
    pub len: usize,
    /// Participant's clock.
    pub timestamp: LogicalTimestamp,
}

/// Replies sent by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParticipantReply {
    /// Answer to PREPARE.
    Voted(PrepareReply),
    /// Answer to COMMIT.
    Committed {
        /// Participant's clock.
        timestamp: LogicalTimestamp,
    },
    /// Answer to ABORT.
    Aborted {
        /// Participant's clock.
        timestamp: LogicalTimestamp,
    },
    /// Answer to a status query.
    Playlist(PlaylistStatus),
    /// The request was malformed.
    Error(ErrorReply),
}

impl Stamped for ParticipantReply {
    fn timestamp(&self) -> &LogicalTimestamp {
        match self {
            Self::Voted(v) => &v.timestamp,
            Self::Committed { timestamp } | Self::Aborted { timestamp } => timestamp,
            Self::Playlist(p) => &p.timestamp,
            Self::Error(e) => &e.timestamp,
        }
    }
}

// ============================================================
// CLIENT → REQUEST SERVER
// ============================================================

/// A stamped playback request.
///
/// `node_id` travels alongside the timestamp; receivers reject a request
/// whose `node_id` disagrees with `timestamp.node_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    /// Human-readable song request (`"<title> - <artist>"`).
    pub song: String,
    /// Requester's clock.
    pub timestamp: LogicalTimestamp,
    /// The requesting node.
    pub node_id: NodeId,
}

impl PlaybackRequest {
    /// A request from the owner of `timestamp`.
    pub fn new(song: impl Into<String>, timestamp: LogicalTimestamp) -> Self {
        let node_id = timestamp.node_id.clone();
        Self {
            song: song.into(),
            timestamp,
            node_id,
        }
    }

    /// Whether the claimed sender matches the clock owner in the stamp.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.node_id == self.timestamp.node_id
    }
}

impl Stamped for PlaybackRequest {
    fn timestamp(&self) -> &LogicalTimestamp {
        &self.timestamp
    }
}

/// Acknowledgment of a serviced playback request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackResponse {
    /// Human-readable acknowledgment.
    pub message: String,
    /// Server's clock.
    pub timestamp: LogicalTimestamp,
}

/// Replies sent by the request server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaybackReply {
    /// The request was serviced.
    Ok(PlaybackResponse),
    /// The request was malformed.
    Error(ErrorReply),
}

impl Stamped for PlaybackReply {
    fn timestamp(&self) -> &LogicalTimestamp {
        match self {
            Self::Ok(r) => &r.timestamp,
            Self::Error(e) => &e.timestamp,
        }
    }
}
