//! IPC message handler for coordinator-driven phases.

use crate::ports::ParticipantApi;
use async_trait::async_trait;
use shared_transport::FrameHandler;
use shared_types::{
    ErrorReply, ParticipantReply, ParticipantRequest, PlaylistStatus, PrepareReply, Stamped,
};
use std::sync::Arc;
use tracing::debug;

/// Wire handler wrapping a [`ParticipantApi`].
pub struct ParticipantHandler<A: ParticipantApi> {
    api: Arc<A>,
}

impl<A: ParticipantApi> ParticipantHandler<A> {
    /// Creates a new handler.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: ParticipantApi + 'static> FrameHandler for ParticipantHandler<A> {
    type Request = ParticipantRequest;
    type Reply = ParticipantReply;

    async fn handle(&self, request: ParticipantRequest) -> ParticipantReply {
        let clock = self.api.clock();
        let received = clock.observe(request.timestamp());
        debug!(%received, from = %request.timestamp().node_id, "[ch-03] phase message received");

        match request {
            ParticipantRequest::Prepare(p) => {
                let vote = self.api.prepare(p.transaction_id, p.operation, p.song_id);
                ParticipantReply::Voted(PrepareReply {
                    vote: vote.vote,
                    reason: vote.reason,
                    timestamp: clock.tick(),
                })
            }
            ParticipantRequest::Commit(c) => {
                self.api.commit(&c.transaction_id, c.operation, &c.song_id);
                ParticipantReply::Committed {
                    timestamp: clock.tick(),
                }
            }
            ParticipantRequest::Abort(a) => {
                self.api.abort(&a.transaction_id);
                ParticipantReply::Aborted {
                    timestamp: clock.tick(),
                }
            }
            ParticipantRequest::Status(_) => {
                let summary = self.api.status();
                ParticipantReply::Playlist(PlaylistStatus {
                    version: summary.version,
                    digest: summary.digest,
                    len: summary.len,
                    timestamp: clock.tick(),
                })
            }
        }
    }

    fn reject(&self, reason: String) -> ParticipantReply {
        ParticipantReply::Error(ErrorReply {
            message: reason,
            timestamp: self.api.clock().tick(),
        })
    }
}
