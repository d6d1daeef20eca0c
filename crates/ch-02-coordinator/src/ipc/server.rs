//! TCP front end lifecycle.

use crate::domain::CoordinatorError;
use crate::ipc::handler::CoordinatorHandler;
use crate::ports::CoordinatorApi;
use parking_lot::Mutex;
use shared_transport::{FrameServer, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Listens for [`shared_types::CoordinatorRequest`]s.
pub struct CoordinatorServer<A: CoordinatorApi + 'static> {
    api: Arc<A>,
    listen_addr: String,
    server: Mutex<Option<FrameServer>>,
}

impl<A: CoordinatorApi + 'static> CoordinatorServer<A> {
    /// Create a stopped server.
    pub fn new(api: Arc<A>, listen_addr: impl Into<String>) -> Self {
        Self {
            api,
            listen_addr: listen_addr.into(),
            server: Mutex::new(None),
        }
    }

    /// Bind and start accepting. Returns the bound address.
    pub async fn start(&self) -> Result<SocketAddr, CoordinatorError> {
        if self.server.lock().is_some() {
            return Err(CoordinatorError::AlreadyRunning);
        }
        let handler = Arc::new(CoordinatorHandler::new(Arc::clone(&self.api)));
        let server = FrameServer::bind(
            "coordinator",
            &self.listen_addr,
            handler,
            ServerConfig::default(),
        )
        .await?;
        let local_addr = server.local_addr();
        *self.server.lock() = Some(server);
        info!(%local_addr, "[ch-02] coordinator listening");
        Ok(local_addr)
    }

    /// Stop accepting. Idempotent.
    pub async fn stop(&self) {
        let server = self.server.lock().take();
        if let Some(server) = server {
            server.stop().await;
            info!("[ch-02] coordinator stopped");
        }
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.lock().as_ref().map(|s| s.local_addr())
    }
}
