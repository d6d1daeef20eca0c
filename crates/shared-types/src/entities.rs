//! # Core Entities
//!
//! Identity newtypes, the Lamport timestamp pair, and the small enums that
//! describe playlist mutations and their outcome.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// IDENTITIES
// =============================================================================

/// Identity of a clock owner (client, coordinator, or request server).
///
/// Ordering is lexicographic; it is the tie-break of [`LogicalTimestamp`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of a song in the shared catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    /// Create a song identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SongId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Coordinator-assigned transaction identifier (`txn_<n>`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Build the identifier for the `sequence`-th transaction of a coordinator.
    #[must_use]
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("txn_{sequence}"))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// =============================================================================
// LOGICAL TIME
// =============================================================================

/// A Lamport timestamp: `(counter, node_id)`.
///
/// Comparison is lexicographic on the field order, so equal counters are
/// ordered by `node_id` and the order over all stamped events is total.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalTimestamp {
    /// Lamport counter value. Decoding rejects values above
    /// [`LogicalTimestamp::MAX_COUNTER`].
    #[serde(deserialize_with = "bounded_counter")]
    pub counter: u64,
    /// Owner of the clock that produced this value.
    pub node_id: NodeId,
}

impl LogicalTimestamp {
    /// Largest counter accepted from the wire. Leaves headroom so that
    /// `max(local, received) + 1` cannot overflow.
    pub const MAX_COUNTER: u64 = u64::MAX / 2;

    /// Create a timestamp.
    pub fn new(counter: u64, node_id: impl Into<NodeId>) -> Self {
        Self {
            counter,
            node_id: node_id.into(),
        }
    }
}

fn bounded_counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let counter = u64::deserialize(deserializer)?;
    if counter > LogicalTimestamp::MAX_COUNTER {
        return Err(serde::de::Error::custom(format!(
            "counter {counter} exceeds {}",
            LogicalTimestamp::MAX_COUNTER
        )));
    }
    Ok(counter)
}

impl fmt::Display for LogicalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.counter, self.node_id)
    }
}

// =============================================================================
// PLAYLIST MUTATIONS
// =============================================================================

/// A playlist mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Insert a song that is not yet present.
    Add,
    /// Remove a song that is present.
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// The `operation` field as it arrives on the wire.
///
/// Participants must answer an unrecognised operation with a
/// `no/invalid_operation` vote instead of rejecting the whole frame, so the
/// raw string is kept when it is not one of the known values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationCode {
    /// `add` or `remove`.
    Known(Operation),
    /// Anything else.
    Unknown(String),
}

impl OperationCode {
    /// The recognised operation, if any.
    #[must_use]
    pub fn known(&self) -> Option<Operation> {
        match self {
            Self::Known(op) => Some(*op),
            Self::Unknown(_) => None,
        }
    }
}

impl From<Operation> for OperationCode {
    fn from(op: Operation) -> Self {
        Self::Known(op)
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(op) => op.fmt(f),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

// =============================================================================
// TRANSACTION STATE & VOTES
// =============================================================================

/// Lifecycle of a transaction, shared by coordinator records and
/// participant ledger entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Phase 1 in progress.
    Preparing,
    /// Decision: commit (terminal).
    Committed,
    /// Decision: abort (terminal).
    Aborted,
}

impl TransactionState {
    /// Check if this is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Aborted)
    }

    /// Check if transition to `next` is valid.
    #[must_use]
    pub fn can_transition_to(&self, next: TransactionState) -> bool {
        matches!(
            (self, next),
            (Self::Preparing, Self::Committed) | (Self::Preparing, Self::Aborted)
        )
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preparing => f.write_str("preparing"),
            Self::Committed => f.write_str("committed"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

/// A participant's answer to PREPARE.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    /// The mutation is valid against the committed playlist.
    Yes,
    /// The mutation cannot be applied.
    No,
}

/// Why a participant voted `no`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteReason {
    /// `add` of a song already in the playlist.
    Duplicate,
    /// `remove` of a song not in the playlist.
    NotFound,
    /// Operation other than `add` / `remove`.
    InvalidOperation,
    /// No reply within the timeout, refused connection, or malformed reply.
    /// Assigned by the coordinator, never sent by a participant.
    Unreachable,
}

impl fmt::Display for VoteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Duplicate => "duplicate",
            Self::NotFound => "not_found",
            Self::InvalidOperation => "invalid_operation",
            Self::Unreachable => "unreachable",
        };
        f.write_str(s)
    }
}

/// One participant's vote as recorded by the coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// The vote.
    pub vote: Vote,
    /// Reason code for a `no` vote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<VoteReason>,
}

impl VoteRecord {
    /// A `yes` vote.
    #[must_use]
    pub fn yes() -> Self {
        Self {
            vote: Vote::Yes,
            reason: None,
        }
    }

    /// A `no` vote with a reason.
    #[must_use]
    pub fn no(reason: VoteReason) -> Self {
        Self {
            vote: Vote::No,
            reason: Some(reason),
        }
    }

    /// Check if this is a `yes` vote.
    #[must_use]
    pub fn is_yes(&self) -> bool {
        self.vote == Vote::Yes
    }
}

/// Why the coordinator aborted a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// No participant was registered; Phase 1 never ran.
    NoParticipants,
    /// At least one participant voted `no` (explicitly or implicitly).
    VotedNo,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParticipants => f.write_str("no_participants"),
            Self::VotedNo => f.write_str("voted_no"),
        }
    }
}
