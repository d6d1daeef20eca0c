//! # Participant Registry
//!
//! One entry per live `client_id`; re-registration overwrites.

use crate::domain::entities::{ParticipantAddress, ParticipantRegistration};
use shared_types::NodeId;
use std::collections::BTreeMap;

/// Registered participants, ordered by node id.
#[derive(Debug, Default, Clone)]
pub struct ParticipantRegistry {
    entries: BTreeMap<NodeId, ParticipantAddress>,
}

impl ParticipantRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite. Returns the previous address, if any.
    pub fn register(
        &mut self,
        client_id: NodeId,
        address: ParticipantAddress,
    ) -> Option<ParticipantAddress> {
        self.entries.insert(client_id, address)
    }

    /// Remove. Returns whether an entry existed.
    pub fn deregister(&mut self, client_id: &NodeId) -> bool {
        self.entries.remove(client_id).is_some()
    }

    /// Copy of every entry.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ParticipantRegistration> {
        self.entries
            .iter()
            .map(|(id, addr)| ParticipantRegistration {
                client_id: id.clone(),
                address: addr.clone(),
            })
            .collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no participant is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
