//! TCP front end lifecycle.

use crate::domain::ParticipantError;
use crate::ipc::handler::ParticipantHandler;
use crate::ports::ParticipantApi;
use parking_lot::Mutex;
use shared_transport::{FrameServer, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Listens for [`shared_types::ParticipantRequest`]s from the coordinator.
pub struct ParticipantServer<A: ParticipantApi + 'static> {
    api: Arc<A>,
    listen_addr: String,
    server: Mutex<Option<FrameServer>>,
}

impl<A: ParticipantApi + 'static> ParticipantServer<A> {
    /// Create a stopped server.
    pub fn new(api: Arc<A>, listen_addr: impl Into<String>) -> Self {
        Self {
            api,
            listen_addr: listen_addr.into(),
            server: Mutex::new(None),
        }
    }

    /// Bind and start accepting. Returns the bound address, which is what
    /// gets announced to the coordinator.
    pub async fn start(&self) -> Result<SocketAddr, ParticipantError> {
        if self.server.lock().is_some() {
            return Err(ParticipantError::AlreadyRunning);
        }
        let handler = Arc::new(ParticipantHandler::new(Arc::clone(&self.api)));
        let server = FrameServer::bind(
            "participant",
            &self.listen_addr,
            handler,
            ServerConfig::default(),
        )
        .await?;
        let local_addr = server.local_addr();
        *self.server.lock() = Some(server);
        info!(%local_addr, "[ch-03] participant listening");
        Ok(local_addr)
    }

    /// Stop accepting. Idempotent.
    pub async fn stop(&self) {
        let server = self.server.lock().take();
        if let Some(server) = server {
            server.stop().await;
            info!("[ch-03] participant stopped");
        }
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.lock().as_ref().map(|s| s.local_addr())
    }
}
