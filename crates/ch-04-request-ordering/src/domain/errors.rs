//! # Domain Errors

use shared_transport::TransportError;
use shared_types::NodeId;
use thiserror::Error;

/// Ordering error types.
#[derive(Debug, Error)]
pub enum OrderingError {
    /// A request named no song.
    #[error("Playback request has an empty song")]
    EmptySong,

    /// `node_id` names a different node than the timestamp's owner.
    #[error("Playback request from {claimed} carries a timestamp of {stamped}")]
    NodeMismatch {
        /// Sender named in the request.
        claimed: NodeId,
        /// Owner of the attached timestamp.
        stamped: NodeId,
    },

    /// Binding or serving failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// `start()` on a server that is already listening.
    #[error("Request server already running")]
    AlreadyRunning,
}
