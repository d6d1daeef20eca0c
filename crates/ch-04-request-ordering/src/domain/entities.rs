//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{LogicalTimestamp, NodeId};

/// One playback request as recorded by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedRequest {
    /// Requester's clock at send time; sort key.
    pub timestamp: LogicalTimestamp,
    /// Requested song.
    pub song: String,
    /// Server clock after observing the request.
    pub received_at: LogicalTimestamp,
}

impl QueuedRequest {
    /// The requesting node.
    pub fn requester(&self) -> &NodeId {
        &self.timestamp.node_id
    }
}

/// What a playback device is asked to play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    /// Location handed to the device.
    pub file: String,
    /// Display title.
    pub title: String,
    /// Display artist; empty when unknown.
    pub artist: String,
}

impl Track {
    /// Track for a bare song request. The song name doubles as file and
    /// title; requests carry no artist.
    pub fn from_song(song: &str) -> Self {
        Self {
            file: song.to_string(),
            title: song.to_string(),
            artist: String::new(),
        }
    }
}
