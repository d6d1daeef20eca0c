//! # Shared Bus - Artist Update Notifications
//!
//! In-process stand-in for the publish/subscribe broker that fans artist
//! updates out to interested listeners.
//!
//! ```text
//! ┌────────────────┐  publish()   ┌──────────────┐  subscribe(filter)  ┌──────────┐
//! │ ArtistPublisher│ ───────────→ │ Event Bus    │ ──────────────────→ │ listener │
//! │ (ticks clock)  │ artist.<name>│ (broadcast)  │  artist.<fav> only  │ task     │
//! └────────────────┘              └──────────────┘                     └──────────┘
//! ```
//!
//! Every event carries the publisher's Lamport counter so receivers can
//! fold it into their own clocks. Delivery is best-effort: a subscriber
//! that falls more than the channel capacity behind skips the oldest
//! events.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{ArtistUpdate, EventFilter, NotificationEvent, Topic};
pub use publisher::{ArtistPublisher, EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before old ones are skipped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Prefix of every artist topic (`artist.<name>`).
pub const ARTIST_TOPIC_PREFIX: &str = "artist.";
