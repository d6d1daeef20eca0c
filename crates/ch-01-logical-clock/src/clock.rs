//! # Lamport Clock

use parking_lot::Mutex;
use shared_types::{LogicalTimestamp, NodeId};
use std::fmt;
use tracing::{trace, warn};

/// A thread-safe Lamport clock owned by one node.
///
/// `tick` and `observe` are serialised by a mutex, so no two events on the
/// same node read-modify-write the counter concurrently. Share it behind an
/// `Arc` between the tasks of one node.
///
/// Wire decoding caps received counters at [`LogicalTimestamp::MAX_COUNTER`].
/// Arithmetic saturates at `u64::MAX` for stamps built in-process, so the
/// counter never wraps back below a value it already handed out.
pub struct LogicalClock {
    owner: NodeId,
    counter: Mutex<u64>,
}

impl LogicalClock {
    /// Create a clock at counter 0.
    pub fn new(owner: impl Into<NodeId>) -> Self {
        Self::starting_at(owner, 0)
    }

    /// Create a clock at a given counter value.
    pub fn starting_at(owner: impl Into<NodeId>, counter: u64) -> Self {
        Self {
            owner: owner.into(),
            counter: Mutex::new(counter),
        }
    }

    /// The node this clock belongs to.
    #[must_use]
    pub fn owner(&self) -> &NodeId {
        &self.owner
    }

    /// Advance for a send event and return the stamp to attach.
    pub fn tick(&self) -> LogicalTimestamp {
        let mut counter = self.counter.lock();
        *counter = self.advance(*counter);
        trace!(node = %self.owner, counter = *counter, "tick");
        LogicalTimestamp::new(*counter, self.owner.clone())
    }

    /// Fold a received stamp into the clock: `max(local, received) + 1`.
    pub fn observe(&self, received: &LogicalTimestamp) -> LogicalTimestamp {
        let mut counter = self.counter.lock();
        *counter = self.advance((*counter).max(received.counter));
        trace!(
            node = %self.owner,
            received = %received,
            counter = *counter,
            "observe"
        );
        LogicalTimestamp::new(*counter, self.owner.clone())
    }

    fn advance(&self, from: u64) -> u64 {
        from.checked_add(1).unwrap_or_else(|| {
            warn!(node = %self.owner, "logical clock saturated at u64::MAX");
            u64::MAX
        })
    }

    /// Current value without advancing.
    #[must_use]
    pub fn snapshot(&self) -> LogicalTimestamp {
        LogicalTimestamp::new(*self.counter.lock(), self.owner.clone())
    }
}

impl fmt::Debug for LogicalClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogicalClock")
            .field("owner", &self.owner)
            .field("counter", &*self.counter.lock())
            .finish()
    }
}

impl fmt::Display for LogicalClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node[{}] time: {}", self.owner, *self.counter.lock())
    }
}
