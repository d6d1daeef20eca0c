//! TCP front end lifecycle.

use crate::domain::OrderingError;
use crate::ipc::handler::OrderingHandler;
use crate::ports::OrderingApi;
use parking_lot::Mutex;
use shared_transport::{FrameServer, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// The ordered request server: listens for [`shared_types::PlaybackRequest`]s.
pub struct OrderedRequestServer<A: OrderingApi + 'static> {
    api: Arc<A>,
    listen_addr: String,
    server: Mutex<Option<FrameServer>>,
}

impl<A: OrderingApi + 'static> OrderedRequestServer<A> {
    /// Create a stopped server.
    pub fn new(api: Arc<A>, listen_addr: impl Into<String>) -> Self {
        Self {
            api,
            listen_addr: listen_addr.into(),
            server: Mutex::new(None),
        }
    }

    /// Bind and start accepting. Returns the bound address.
    pub async fn start(&self) -> Result<SocketAddr, OrderingError> {
        if self.server.lock().is_some() {
            return Err(OrderingError::AlreadyRunning);
        }
        let handler = Arc::new(OrderingHandler::new(Arc::clone(&self.api)));
        let server = FrameServer::bind(
            "request-server",
            &self.listen_addr,
            handler,
            ServerConfig::default(),
        )
        .await?;
        let local_addr = server.local_addr();
        *self.server.lock() = Some(server);
        info!(%local_addr, "[ch-04] request server listening");
        Ok(local_addr)
    }

    /// Stop accepting. Idempotent.
    pub async fn stop(&self) {
        let server = self.server.lock().take();
        if let Some(server) = server {
            server.stop().await;
            info!("[ch-04] request server stopped");
        }
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.lock().as_ref().map(|s| s.local_addr())
    }

    /// Copy of the pending log.
    pub fn pending(&self) -> Vec<crate::domain::QueuedRequest> {
        self.api.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::OrderingService;
    use crate::config::OrderingConfig;
    use crate::ports::outbound::mocks::RecordingDevice;
    use shared_types::{LogicalTimestamp, PlaybackReply, PlaybackRequest};
    use std::time::Duration;

    #[tokio::test]
    async fn test_requests_over_tcp_are_logged_in_order() {
        let svc = Arc::new(OrderingService::new(
            OrderingConfig::for_testing(),
            RecordingDevice::new(),
        ));
        let server = OrderedRequestServer::new(svc, "127.0.0.1:0");
        let addr = server.start().await.unwrap().to_string();
        assert!(matches!(server.start().await, Err(OrderingError::AlreadyRunning)));

        for (counter, node) in [(3, "B"), (1, "A"), (2, "C")] {
            let reply: PlaybackReply = shared_transport::request(
                &addr,
                &PlaybackRequest::new(format!("from {node}"), LogicalTimestamp::new(counter, node)),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
            assert!(matches!(reply, PlaybackReply::Ok(_)));
        }

        let order: Vec<_> = server
            .pending()
            .iter()
            .map(|r| r.requester().to_string())
            .collect();
        assert_eq!(order, vec!["A", "C", "B"]);

        let reply: PlaybackReply = shared_transport::request(
            &addr,
            &serde_json::json!({"song": "no timestamp"}),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert!(matches!(reply, PlaybackReply::Error(_)));

        server.stop().await;
        server.stop().await;
        assert!(server.local_addr().is_none());
    }
}
