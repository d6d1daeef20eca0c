//! # Client Side
//!
//! Connect, send one frame, read one frame, close.

use crate::error::TransportError;
use crate::framing::{read_frame, write_frame};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Perform one request/response exchange with `addr` (`host:port`).
///
/// Connecting, writing and reading all share a single `timeout`; the
/// connection is closed when this returns, successful or not.
pub async fn request<Q, R>(addr: &str, request: &Q, timeout: Duration) -> Result<R, TransportError>
where
    Q: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let payload = serde_json::to_vec(request)?;

    let exchange = async {
        let mut stream =
            TcpStream::connect(addr)
                .await
                .map_err(|source| TransportError::Connect {
                    addr: addr.to_string(),
                    source,
                })?;
        write_frame(&mut stream, &payload).await?;
        read_frame(&mut stream).await
    };

    let frame = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| TransportError::Timeout(timeout))??;

    debug!(addr, bytes = frame.len(), "[transport] reply received");
    Ok(serde_json::from_slice(&frame)?)
}
