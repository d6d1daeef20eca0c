//! IPC message handler for playback requests.

use crate::domain::OrderingError;
use crate::ports::OrderingApi;
use async_trait::async_trait;
use shared_transport::FrameHandler;
use shared_types::{ErrorReply, PlaybackReply, PlaybackRequest, PlaybackResponse};
use std::sync::Arc;
use tracing::warn;

/// Wire handler wrapping an [`OrderingApi`].
pub struct OrderingHandler<A: OrderingApi> {
    api: Arc<A>,
}

impl<A: OrderingApi> OrderingHandler<A> {
    /// Creates a new handler.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    fn error(&self, message: String) -> PlaybackReply {
        PlaybackReply::Error(ErrorReply {
            message,
            timestamp: self.api.clock().tick(),
        })
    }
}

#[async_trait]
impl<A: OrderingApi + 'static> FrameHandler for OrderingHandler<A> {
    type Request = PlaybackRequest;
    type Reply = PlaybackReply;

    async fn handle(&self, request: PlaybackRequest) -> PlaybackReply {
        let clock = self.api.clock();
        clock.observe(&request.timestamp);
        let from = request.node_id.clone();

        let accepted = if request.is_consistent() {
            self.api.accept(request.song, request.timestamp)
        } else {
            Err(OrderingError::NodeMismatch {
                claimed: request.node_id,
                stamped: request.timestamp.node_id,
            })
        };
        match accepted {
            Ok(message) => PlaybackReply::Ok(PlaybackResponse {
                message,
                timestamp: clock.tick(),
            }),
            Err(e) => {
                warn!(%from, error = %e, "[ch-04] playback request rejected");
                self.error(e.to_string())
            }
        }
    }

    fn reject(&self, reason: String) -> PlaybackReply {
        self.error(reason)
    }
}
