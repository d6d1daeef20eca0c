//! # Server Side
//!
//! An accept loop that hands each connection to its own task. Every task
//! reads one request frame, asks the [`FrameHandler`] for a reply, writes it
//! back and closes.

use crate::error::TransportError;
use crate::framing::{read_frame, write_frame};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Turns decoded requests into replies.
#[async_trait]
pub trait FrameHandler: Send + Sync + 'static {
    /// Request message type.
    type Request: DeserializeOwned + Send;
    /// Reply message type.
    type Reply: Serialize + Send;

    /// Produce the reply for a well-formed request.
    async fn handle(&self, request: Self::Request) -> Self::Reply;

    /// Produce the explicit error reply for an undecodable request.
    fn reject(&self, reason: String) -> Self::Reply;
}

/// Per-connection limits.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// Max time to wait for the request frame.
    pub read_timeout: Duration,
    /// Max time to spend writing the reply frame.
    pub write_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            read_timeout: crate::PROTOCOL_TIMEOUT,
            write_timeout: crate::PROTOCOL_TIMEOUT,
        }
    }
}

/// A running listener.
pub struct FrameServer {
    name: &'static str,
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    accept_task: Mutex<Option<JoinHandle<()>>>,
}

impl FrameServer {
    /// Bind `addr` and start accepting in the background.
    ///
    /// Bind to port 0 to let the OS choose; [`local_addr`](Self::local_addr)
    /// reports the real port.
    pub async fn bind<H: FrameHandler>(
        name: &'static str,
        addr: &str,
        handler: Arc<H>,
        config: ServerConfig,
    ) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(server = name, %local_addr, "[transport] listening");
        let accept_task = tokio::spawn(accept_loop(name, listener, handler, config, shutdown_rx));

        Ok(Self {
            name,
            local_addr,
            shutdown_tx,
            accept_task: Mutex::new(Some(accept_task)),
        })
    }

    /// The bound address.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the accept loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !*self.shutdown_tx.borrow()
    }

    /// Stop accepting and release the port. Safe to call repeatedly.
    ///
    /// Connections already accepted finish on their own tasks.
    pub async fn stop(&self) {
        self.shutdown_tx.send_replace(true);
        let task = self.accept_task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(server = self.name, error = %e, "[transport] accept task ended abnormally");
            }
            info!(server = self.name, local_addr = %self.local_addr, "[transport] stopped");
        }
    }
}

impl Drop for FrameServer {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

async fn accept_loop<H: FrameHandler>(
    name: &'static str,
    listener: TcpListener,
    handler: Arc<H>,
    config: ServerConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let handler = Arc::clone(&handler);
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(handler, stream, config).await {
                            debug!(server = name, %peer, error = %e, "[transport] connection dropped");
                        }
                    });
                }
                Err(e) => {
                    warn!(server = name, error = %e, "[transport] accept failed");
                }
            },
        }
    }
}

async fn serve_connection<H: FrameHandler>(
    handler: Arc<H>,
    mut stream: TcpStream,
    config: ServerConfig,
) -> Result<(), TransportError> {
    let read = tokio::time::timeout(config.read_timeout, read_frame(&mut stream))
        .await
        .map_err(|_| TransportError::Timeout(config.read_timeout))?;

    let reply = match read {
        Ok(frame) => match serde_json::from_slice::<H::Request>(&frame) {
            Ok(request) => handler.handle(request).await,
            Err(e) => {
                warn!(error = %e, "[transport] malformed request");
                handler.reject(format!("malformed request: {e}"))
            }
        },
        Err(e @ TransportError::FrameTooLarge { .. }) => {
            warn!(error = %e, "[transport] oversized request");
            handler.reject(e.to_string())
        }
        Err(e) => return Err(e),
    };

    let bytes = serde_json::to_vec(&reply)?;
    tokio::time::timeout(config.write_timeout, write_frame(&mut stream, &bytes))
        .await
        .map_err(|_| TransportError::Timeout(config.write_timeout))?
}
