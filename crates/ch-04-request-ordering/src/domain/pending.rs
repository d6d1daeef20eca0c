//! # Pending Log
//!
//! Requests sorted by `(counter, node_id)` regardless of arrival order.
//! Nothing waits for stragglers: an entry is serviced when it arrives and
//! only its position in the log reflects the causal order.

use crate::domain::entities::QueuedRequest;

/// Bounded, sorted log of serviced requests.
#[derive(Clone, Debug)]
pub struct PendingLog {
    entries: Vec<QueuedRequest>,
    capacity: usize,
}

impl PendingLog {
    /// Empty log holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Insert in timestamp order. Returns the entry evicted to stay within
    /// capacity, which is always the one with the smallest timestamp.
    pub fn insert(&mut self, request: QueuedRequest) -> Option<QueuedRequest> {
        // after any equal keys, so duplicates keep arrival order
        let at = self
            .entries
            .partition_point(|e| e.timestamp <= request.timestamp);
        self.entries.insert(at, request);
        if self.entries.len() > self.capacity {
            Some(self.entries.remove(0))
        } else {
            None
        }
    }

    /// Entries, lowest timestamp first.
    pub fn entries(&self) -> &[QueuedRequest] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::LogicalTimestamp;

    fn req(counter: u64, node: &str) -> QueuedRequest {
        QueuedRequest {
            timestamp: LogicalTimestamp::new(counter, node),
            song: format!("song-{counter}-{node}"),
            received_at: LogicalTimestamp::new(0, "SERVER"),
        }
    }

    fn keys(log: &PendingLog) -> Vec<(u64, String)> {
        log.entries()
            .iter()
            .map(|e| (e.timestamp.counter, e.timestamp.node_id.to_string()))
            .collect()
    }

    #[test]
    fn test_orders_by_counter_then_node() {
        let mut log = PendingLog::new(16);
        log.insert(req(3, "B"));
        log.insert(req(1, "A"));
        log.insert(req(2, "C"));
        assert_eq!(
            keys(&log),
            vec![(1, "A".into()), (2, "C".into()), (3, "B".into())]
        );
    }

    #[test]
    fn test_equal_counters_break_on_node_id() {
        let mut log = PendingLog::new(16);
        log.insert(req(4, "CLIENT_2"));
        log.insert(req(4, "CLIENT_1"));
        assert_eq!(log.entries()[0].timestamp.node_id.as_str(), "CLIENT_1");
    }

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let mut log = PendingLog::new(2);
        assert!(log.insert(req(5, "A")).is_none());
        assert!(log.insert(req(2, "A")).is_none());
        let evicted = log.insert(req(9, "A")).unwrap();
        assert_eq!(evicted.timestamp.counter, 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut log = PendingLog::new(0);
        log.insert(req(1, "A"));
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_is_sorted(
            stamps in proptest::collection::vec((0u64..20, 0u8..4), 0..40)
        ) {
            let mut log = PendingLog::new(64);
            for (counter, node) in &stamps {
                log.insert(req(*counter, &format!("N{node}")));
            }
            let sorted = log.entries().windows(2).all(|w| w[0].timestamp <= w[1].timestamp);
            prop_assert!(sorted);
            prop_assert_eq!(log.len(), stamps.len());
        }
    }
}
