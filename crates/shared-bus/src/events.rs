//! # Notification Events
//!
//! Event payloads and topic routing for the notification bus.

use crate::ARTIST_TOPIC_PREFIX;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{LogicalTimestamp, NodeId};
use std::collections::BTreeSet;
use std::fmt;

/// All events that can be published to the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// News about an artist.
    ArtistUpdate(ArtistUpdate),
}

impl NotificationEvent {
    /// Routing topic for this event.
    #[must_use]
    pub fn topic(&self) -> Topic {
        match self {
            Self::ArtistUpdate(update) => Topic::artist(&update.artist),
        }
    }

    /// Logical stamp of the publisher at publish time.
    #[must_use]
    pub fn logical_timestamp(&self) -> LogicalTimestamp {
        match self {
            Self::ArtistUpdate(update) => update.logical_timestamp(),
        }
    }
}

/// One artist update, as published on `artist.<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistUpdate {
    /// Artist the update is about.
    pub artist: String,
    /// Free-form message text.
    pub message: String,
    /// Wall-clock publish time. Informational only; never used for ordering.
    pub timestamp_utc: DateTime<Utc>,
    /// Publisher's Lamport counter.
    pub lamport_timestamp: u64,
    /// Publisher's node id.
    pub node_id: NodeId,
}

impl ArtistUpdate {
    /// The `(lamport_timestamp, node_id)` pair as a timestamp.
    #[must_use]
    pub fn logical_timestamp(&self) -> LogicalTimestamp {
        LogicalTimestamp::new(self.lamport_timestamp, self.node_id.clone())
    }
}

/// A routing key such as `artist.Taylor Swift`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Topic for one artist.
    #[must_use]
    pub fn artist(name: &str) -> Self {
        Self(format!("{ARTIST_TOPIC_PREFIX}{name}"))
    }

    /// The routing key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Artist name, if this is an artist topic.
    #[must_use]
    pub fn artist_name(&self) -> Option<&str> {
        self.0.strip_prefix(ARTIST_TOPIC_PREFIX)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filter for subscribing to a subset of topics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Topics to receive. Empty means everything.
    pub topics: BTreeSet<Topic>,
}

impl EventFilter {
    /// Receive every event.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Receive updates for the given artists only.
    pub fn artists<I, S>(artists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            topics: artists
                .into_iter()
                .map(|a| Topic::artist(a.as_ref()))
                .collect(),
        }
    }

    /// Check if an event passes this filter.
    #[must_use]
    pub fn matches(&self, event: &NotificationEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&event.topic())
    }
}
