//! IPC message handler for the coordinator.
//!
//! Every inbound request is observed on the coordinator's clock before it is
//! handled; every reply carries a fresh tick.

use crate::domain::{CoordinatorError, ParticipantAddress};
use crate::ports::CoordinatorApi;
use async_trait::async_trait;
use shared_transport::FrameHandler;
use shared_types::{CoordinatorReply, CoordinatorRequest, ErrorReply, Stamped};
use std::sync::Arc;
use tracing::{debug, warn};

/// Wire handler wrapping a [`CoordinatorApi`].
pub struct CoordinatorHandler<A: CoordinatorApi> {
    api: Arc<A>,
}

impl<A: CoordinatorApi> CoordinatorHandler<A> {
    /// Creates a new handler.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    fn error(&self, message: String) -> CoordinatorReply {
        CoordinatorReply::Error(ErrorReply {
            message,
            timestamp: self.api.clock().tick(),
        })
    }
}

#[async_trait]
impl<A: CoordinatorApi + 'static> FrameHandler for CoordinatorHandler<A> {
    type Request = CoordinatorRequest;
    type Reply = CoordinatorReply;

    async fn handle(&self, request: CoordinatorRequest) -> CoordinatorReply {
        let clock = self.api.clock();
        let received = clock.observe(request.timestamp());
        debug!(%received, from = %request.timestamp().node_id, "[ch-02] request received");

        match request {
            CoordinatorRequest::Register(r) => {
                self.api
                    .register(r.client_id, ParticipantAddress::new(r.host, r.port));
                CoordinatorReply::Registered {
                    timestamp: clock.tick(),
                }
            }
            CoordinatorRequest::Deregister(d) => {
                self.api.deregister(&d.client_id);
                CoordinatorReply::Deregistered {
                    timestamp: clock.tick(),
                }
            }
            CoordinatorRequest::Transaction(t) => match t.operation.known() {
                Some(operation) => self
                    .api
                    .begin_transaction(t.client_id, operation, t.song_id)
                    .await
                    .into(),
                None => {
                    let err = CoordinatorError::UnknownOperation(t.operation.to_string());
                    warn!(client = %t.client_id, error = %err, "[ch-02] transaction rejected");
                    self.error(err.to_string())
                }
            },
        }
    }

    fn reject(&self, reason: String) -> CoordinatorReply {
        self.error(reason)
    }
}
