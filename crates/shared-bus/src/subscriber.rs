//! # Event Subscriber
//!
//! The subscription side of the bus.

use crate::events::{EventFilter, NotificationEvent, Topic};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;
use uuid::Uuid;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Anything that hands out subscriptions.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe to events matching a filter.
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// A subscription handle. Dropping it unsubscribes.
pub struct Subscription {
    id: Uuid,
    receiver: broadcast::Receiver<NotificationEvent>,
    filter: EventFilter,
    subscriptions: Arc<RwLock<HashMap<Topic, usize>>>,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<NotificationEvent>,
        filter: EventFilter,
        subscriptions: Arc<RwLock<HashMap<Topic, usize>>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            receiver,
            filter,
            subscriptions,
        }
    }

    /// Unique id, for logs.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the next matching event.
    ///
    /// Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<NotificationEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(subscription = %self.id, lagged = count, "[bus] subscriber lagged, events skipped");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Take the next matching event if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<NotificationEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// The filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut subs = self.subscriptions.write();
        for topic in &self.filter.topics {
            if let Some(count) = subs.get_mut(topic) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    subs.remove(topic);
                }
            }
        }
        debug!(subscription = %self.id, "[bus] subscription dropped");
    }
}

/// Filtered `Stream` of bus events.
pub struct EventStream {
    inner: BroadcastStream<NotificationEvent>,
    filter: EventFilter,
}

impl EventStream {
    pub(crate) fn new(receiver: broadcast::Receiver<NotificationEvent>, filter: EventFilter) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
        }
    }

    /// The filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = NotificationEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    if self.filter.matches(&event) {
                        return Poll::Ready(Some(event));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    debug!(lagged = count, "[bus] stream lagged, events skipped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
