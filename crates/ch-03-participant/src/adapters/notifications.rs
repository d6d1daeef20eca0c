//! # Notification Feed
//!
//! Two background tasks per client: a listener draining the bus
//! subscription into a bounded channel, and a pump handing each update to
//! the agent. A slow agent backs up the channel, not the bus.

use crate::ports::NotificationSink;
use shared_bus::{ArtistUpdate, NotificationEvent, Subscription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Running listener and pump for one subscription.
pub struct NotificationFeed {
    listener: JoinHandle<()>,
    pump: JoinHandle<()>,
}

impl NotificationFeed {
    /// Spawn the listener and pump. Must be called inside a Tokio runtime.
    pub fn start<S>(sink: Arc<S>, subscription: Subscription, buffer: usize) -> Self
    where
        S: NotificationSink + ?Sized + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<ArtistUpdate>(buffer.max(1));
        let listener = tokio::spawn(forward(subscription, tx));
        let pump = tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                sink.on_artist_update(update);
            }
        });
        Self { listener, pump }
    }

    /// Check if the listener is still attached to the bus.
    pub fn is_running(&self) -> bool {
        !self.listener.is_finished()
    }

    /// Stop both tasks. Safe to call more than once.
    pub fn stop(&self) {
        self.listener.abort();
        self.pump.abort();
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn forward(mut subscription: Subscription, tx: mpsc::Sender<ArtistUpdate>) {
    let id = subscription.id();
    while let Some(event) = subscription.recv().await {
        let NotificationEvent::ArtistUpdate(update) = event;
        if tx.send(update).await.is_err() {
            break;
        }
    }
    debug!(subscription = %id, "[ch-03] notification listener finished");
}
