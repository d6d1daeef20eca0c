//! # Playlist
//!
//! Ordered set of song ids with a commit counter and a content digest.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use shared_types::{Operation, SongId};

/// An insertion-ordered set of songs.
///
/// `version` counts applied commits; two playlists with equal `version` and
/// `digest` hold the same songs in the same order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    songs: Vec<SongId>,
    version: u64,
}

impl Playlist {
    /// Empty playlist at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Playlist pre-filled with `songs` (duplicates dropped), version 0.
    pub fn from_songs<I: IntoIterator<Item = SongId>>(songs: I) -> Self {
        let mut playlist = Self::new();
        for song in songs {
            playlist.insert(song);
        }
        playlist
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, song: &SongId) -> bool {
        self.songs.contains(song)
    }

    /// Append if absent. Returns whether it was inserted.
    pub fn insert(&mut self, song: SongId) -> bool {
        if self.contains(&song) {
            return false;
        }
        self.songs.push(song);
        true
    }

    /// Remove if present. Returns whether it was removed.
    pub fn remove(&mut self, song: &SongId) -> bool {
        let before = self.songs.len();
        self.songs.retain(|s| s != song);
        self.songs.len() != before
    }

    /// Apply a mutation. Returns whether the contents changed.
    pub fn apply(&mut self, operation: Operation, song: &SongId) -> bool {
        match operation {
            Operation::Add => self.insert(song.clone()),
            Operation::Remove => self.remove(song),
        }
    }

    /// Check if `operation` on `song` is already reflected here.
    #[must_use]
    pub fn reflects(&self, operation: Operation, song: &SongId) -> bool {
        match operation {
            Operation::Add => self.contains(song),
            Operation::Remove => !self.contains(song),
        }
    }

    /// Mark one more commit as applied.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Commits applied so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Songs in insertion order.
    #[must_use]
    pub fn songs(&self) -> &[SongId] {
        &self.songs
    }

    /// Number of songs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Hex SHA3-256 over the ordered ids, each terminated by a NUL byte.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha3_256::new();
        for song in &self.songs {
            hasher.update(song.as_str().as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }
}
