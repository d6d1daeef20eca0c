//! # Event Publisher
//!
//! The publishing side of the bus.

use crate::events::{ArtistUpdate, EventFilter, NotificationEvent, Topic};
use crate::subscriber::{EventStream, EventSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use ch_01_logical_clock::LogicalClock;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Trait for publishing events to the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event.
    ///
    /// Returns the number of live subscriptions the event was handed to,
    /// before filtering.
    async fn publish(&self, event: NotificationEvent) -> usize;

    /// Total events published.
    fn events_published(&self) -> u64;
}

/// In-memory bus built on `tokio::sync::broadcast`.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<NotificationEvent>,
    /// Live subscription count per topic.
    subscriptions: Arc<RwLock<HashMap<Topic, usize>>>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given per-subscriber buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Get a `Stream` of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Number of live subscriptions naming `topic` explicitly.
    #[must_use]
    pub fn topic_subscribers(&self, topic: &Topic) -> usize {
        self.subscriptions.read().get(topic).copied().unwrap_or(0)
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        {
            let mut subs = self.subscriptions.write();
            for topic in &filter.topics {
                *subs.entry(topic.clone()).or_insert(0) += 1;
            }
        }
        let subscription = Subscription::new(receiver, filter, Arc::clone(&self.subscriptions));
        debug!(
            subscription = %subscription.id(),
            topics = ?subscription.filter().topics,
            "[bus] subscription created"
        );
        subscription
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: NotificationEvent) -> usize {
        let topic = event.topic();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(%topic, receivers, "[bus] event published");
                receivers
            }
            Err(_) => {
                warn!(%topic, "[bus] event dropped (no subscribers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

/// Publishes artist updates stamped with the publisher's clock.
pub struct ArtistPublisher {
    bus: Arc<dyn EventPublisher>,
    clock: Arc<LogicalClock>,
}

impl ArtistPublisher {
    /// Create a publisher that ticks `clock` once per event.
    pub fn new(bus: Arc<dyn EventPublisher>, clock: Arc<LogicalClock>) -> Self {
        Self { bus, clock }
    }

    /// Publish `message` on `artist.<artist>`.
    pub async fn publish_artist_message(&self, artist: &str, message: &str) -> usize {
        let stamp = self.clock.tick();
        let update = ArtistUpdate {
            artist: artist.to_string(),
            message: message.to_string(),
            timestamp_utc: chrono::Utc::now(),
            lamport_timestamp: stamp.counter,
            node_id: stamp.node_id,
        };
        info!(
            topic = %Topic::artist(artist),
            lamport = update.lamport_timestamp,
            text = message,
            "[bus] artist update sent"
        );
        self.bus.publish(NotificationEvent::ArtistUpdate(update)).await
    }
}
