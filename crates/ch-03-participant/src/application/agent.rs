//! # Participant Agent
//!
//! Holds this client's committed playlist and reacts to coordinator
//! messages.

use crate::adapters::NotificationFeed;
use crate::config::ParticipantConfig;
use crate::domain::{LedgerEntry, Playlist, TentativeChange};
use crate::ports::{LedgerStore, NotificationSink, ParticipantApi, PlaylistSummary};
use ch_01_logical_clock::LogicalClock;
use parking_lot::{Mutex, RwLock};
use shared_bus::{ArtistUpdate, EventFilter, EventSubscriber};
use shared_types::{
    NodeId, Operation, OperationCode, SongId, TransactionId, TransactionState, VoteReason,
    VoteRecord,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Participant Agent - one per client.
///
/// Per transaction: `Idle → Preparing → Committed | Aborted`. Staged
/// changes are keyed by transaction id, so a late COMMIT for one
/// transaction never promotes another's copy.
pub struct ParticipantAgent<L: LedgerStore> {
    pub(crate) config: ParticipantConfig,
    pub(crate) clock: Arc<LogicalClock>,
    committed: RwLock<Playlist>,
    tentative: Mutex<HashMap<TransactionId, TentativeChange>>,
    ledger: L,
    news: RwLock<BTreeMap<String, ArtistUpdate>>,
}

impl<L: LedgerStore> ParticipantAgent<L> {
    /// Create an agent with an empty playlist.
    ///
    /// Ledger entries left in `Preparing` are resolved to `Aborted` before
    /// this returns.
    pub fn new(config: ParticipantConfig, ledger: L) -> Self {
        Self::with_playlist(config, ledger, Playlist::new())
    }

    /// Create an agent around an existing committed playlist.
    pub fn with_playlist(config: ParticipantConfig, ledger: L, playlist: Playlist) -> Self {
        let clock = Arc::new(LogicalClock::new(config.node_id.clone()));
        let agent = Self {
            config,
            clock,
            committed: RwLock::new(playlist),
            tentative: Mutex::new(HashMap::new()),
            ledger,
            news: RwLock::new(BTreeMap::new()),
        };
        agent.recover();
        agent
    }

    fn recover(&self) -> usize {
        let mut resolved = 0;
        for entry in self.ledger.entries() {
            if entry.state != TransactionState::Preparing {
                continue;
            }
            match self
                .ledger
                .set_state(&entry.transaction_id, TransactionState::Aborted)
            {
                Ok(()) => resolved += 1,
                Err(e) => error!(
                    transaction_id = %entry.transaction_id,
                    error = %e,
                    "[ch-03] recovery failed to resolve entry"
                ),
            }
        }
        if resolved > 0 {
            warn!(
                node = %self.config.node_id,
                resolved,
                "[ch-03] unfinished transactions resolved to aborted"
            );
        }
        resolved
    }

    /// Agent configuration.
    pub fn config(&self) -> &ParticipantConfig {
        &self.config
    }

    /// This client's id.
    pub fn node_id(&self) -> &NodeId {
        &self.config.node_id
    }

    /// Shared handle to the clock.
    pub fn clock_handle(&self) -> Arc<LogicalClock> {
        Arc::clone(&self.clock)
    }

    /// Copy of the committed playlist.
    pub fn playlist(&self) -> Playlist {
        self.committed.read().clone()
    }

    /// Copy of the ledger.
    pub fn ledger(&self) -> Vec<LedgerEntry> {
        self.ledger.entries()
    }

    /// Ledger entry for one transaction.
    pub fn ledger_entry(&self, id: &TransactionId) -> Option<LedgerEntry> {
        self.ledger.get(id)
    }

    /// Transactions with staged changes awaiting a decision.
    pub fn staged_transactions(&self) -> Vec<TransactionId> {
        let mut ids: Vec<_> = self.tentative.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Latest update seen for an artist.
    pub fn latest_update(&self, artist: &str) -> Option<ArtistUpdate> {
        self.news.read().get(artist).cloned()
    }

    /// Latest update per artist, ordered by artist.
    pub fn artist_updates(&self) -> Vec<ArtistUpdate> {
        self.news.read().values().cloned().collect()
    }

    /// Subscribe to the configured favourite artists and start feeding
    /// their updates into this agent.
    pub fn follow_artists(self: &Arc<Self>, bus: &dyn EventSubscriber) -> NotificationFeed
    where
        L: 'static,
    {
        let subscription = bus.subscribe(EventFilter::artists(&self.config.favorite_artists));
        info!(
            node = %self.config.node_id,
            artists = ?self.config.favorite_artists,
            "[ch-03] following artists"
        );
        NotificationFeed::start(Arc::clone(self), subscription, self.config.notification_buffer)
    }

    /// Bring the committed playlist in line with a transaction the
    /// coordinator reported as committed. Idempotent.
    ///
    /// Only a transaction this agent never saw a PREPARE for is applied from
    /// the result. Once the ledger holds an entry, COMMIT/ABORT handling owns
    /// it, and later transactions may already have moved the playlist on.
    pub(crate) fn reconcile(&self, id: &TransactionId, operation: Operation, song_id: &SongId) {
        let staged = self.tentative.lock().remove(id);
        let mut committed = self.committed.write();
        if let Some(change) = staged {
            *committed = change.promote(&committed);
            drop(committed);
            self.mark(id, TransactionState::Committed);
            warn!(transaction_id = %id, "[ch-03] commit was not delivered here; applied from result");
            return;
        }

        if let Some(entry) = self.ledger.get(id) {
            debug!(transaction_id = %id, state = %entry.state, "[ch-03] already resolved locally");
            return;
        }
        if !committed.reflects(operation, song_id) {
            committed.apply(operation, song_id);
            committed.bump_version();
        }
        let entry = LedgerEntry {
            state: TransactionState::Committed,
            ..LedgerEntry::preparing(id.clone(), operation.into(), song_id.clone(), self.clock.snapshot())
        };
        if let Err(e) = self.ledger.upsert(entry) {
            error!(transaction_id = %id, error = %e, "[ch-03] failed to record reconciled transaction");
        }
        debug!(transaction_id = %id, version = committed.version(), "[ch-03] local view reconciled");
    }

    fn mark(&self, id: &TransactionId, state: TransactionState) {
        if let Err(e) = self.ledger.set_state(id, state) {
            warn!(transaction_id = %id, %state, error = %e, "[ch-03] ledger update failed");
        }
    }

    fn validate(committed: &Playlist, operation: Operation, song_id: &SongId) -> Option<VoteReason> {
        match operation {
            Operation::Add if committed.contains(song_id) => Some(VoteReason::Duplicate),
            Operation::Remove if !committed.contains(song_id) => Some(VoteReason::NotFound),
            _ => None,
        }
    }
}

impl<L: LedgerStore> ParticipantApi for ParticipantAgent<L> {
    fn clock(&self) -> &LogicalClock {
        &self.clock
    }

    fn prepare(
        &self,
        transaction_id: TransactionId,
        operation: OperationCode,
        song_id: SongId,
    ) -> VoteRecord {
        let vote = match operation.known() {
            None => VoteRecord::no(VoteReason::InvalidOperation),
            Some(op) => {
                let change = {
                    let committed = self.committed.read();
                    match Self::validate(&committed, op, &song_id) {
                        Some(reason) => Err(reason),
                        None => Ok(TentativeChange::stage(&committed, op, song_id.clone())),
                    }
                };
                match change {
                    Ok(change) => {
                        self.tentative.lock().insert(transaction_id.clone(), change);
                        VoteRecord::yes()
                    }
                    Err(reason) => VoteRecord::no(reason),
                }
            }
        };

        info!(
            node = %self.config.node_id,
            %transaction_id,
            %operation,
            %song_id,
            vote = ?vote.vote,
            reason = ?vote.reason,
            "[ch-03] PREPARE"
        );

        let entry = LedgerEntry::preparing(transaction_id, operation, song_id, self.clock.snapshot());
        if let Err(e) = self.ledger.upsert(entry) {
            error!(error = %e, "[ch-03] failed to append ledger entry");
        }
        vote
    }

    fn commit(&self, transaction_id: &TransactionId, operation: Operation, song_id: &SongId) {
        let Some(change) = self.tentative.lock().remove(transaction_id) else {
            debug!(%transaction_id, "[ch-03] COMMIT with nothing staged");
            return;
        };
        if change.operation != operation || &change.song_id != song_id {
            warn!(
                %transaction_id,
                staged = %change.operation,
                received = %operation,
                "[ch-03] COMMIT differs from staged change, applying staged"
            );
        }

        let version = {
            let mut committed = self.committed.write();
            *committed = change.promote(&committed);
            committed.version()
        };
        self.mark(transaction_id, TransactionState::Committed);
        info!(
            node = %self.config.node_id,
            %transaction_id,
            %operation,
            %song_id,
            version,
            "[ch-03] COMMIT applied"
        );
    }

    fn abort(&self, transaction_id: &TransactionId) {
        let had_staged = self.tentative.lock().remove(transaction_id).is_some();
        let preparing = self
            .ledger
            .get(transaction_id)
            .is_some_and(|e| e.state == TransactionState::Preparing);
        if preparing {
            self.mark(transaction_id, TransactionState::Aborted);
        }
        if had_staged || preparing {
            info!(node = %self.config.node_id, %transaction_id, "[ch-03] ABORT");
        } else {
            debug!(%transaction_id, "[ch-03] ABORT with nothing outstanding");
        }
    }

    fn status(&self) -> PlaylistSummary {
        let committed = self.committed.read();
        PlaylistSummary {
            version: committed.version(),
            digest: committed.digest(),
            len: committed.len(),
        }
    }
}

impl<L: LedgerStore> NotificationSink for ParticipantAgent<L> {
    fn on_artist_update(&self, update: ArtistUpdate) {
        let local = self.clock.observe(&update.logical_timestamp());
        info!(
            node = %self.config.node_id,
            artist = %update.artist,
            text = %update.message,
            lamport = update.lamport_timestamp,
            %local,
            "[ch-03] artist update"
        );
        let mut news = self.news.write();
        let newer = news
            .get(&update.artist)
            .map_or(true, |seen| seen.logical_timestamp() < update.logical_timestamp());
        if newer {
            news.insert(update.artist.clone(), update);
        }
    }
}
