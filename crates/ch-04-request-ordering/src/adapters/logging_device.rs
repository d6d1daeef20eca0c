//! # Logging Playback Device
//!
//! [`PlaybackDevice`] with no audio output: tracks what would be playing
//! and logs each transition.

use crate::domain::Track;
use crate::ports::PlaybackDevice;
use parking_lot::Mutex;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct DeviceState {
    current: Option<Track>,
    paused: bool,
}

/// Playback device that only logs.
#[derive(Debug, Default)]
pub struct LoggingPlaybackDevice {
    state: Mutex<DeviceState>,
}

impl LoggingPlaybackDevice {
    /// Idle device.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The track that would be playing, if any.
    pub fn now_playing(&self) -> Option<Track> {
        self.state.lock().current.clone()
    }

    /// Check if a track is loaded and paused.
    pub fn is_paused(&self) -> bool {
        let state = self.state.lock();
        state.current.is_some() && state.paused
    }
}

impl PlaybackDevice for LoggingPlaybackDevice {
    fn play(&self, file: &str, title: &str, artist: &str) {
        let mut state = self.state.lock();
        state.current = Some(Track {
            file: file.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
        });
        state.paused = false;
        info!(file, title, artist, "[ch-04] now playing");
    }

    fn pause(&self) {
        let mut state = self.state.lock();
        if state.current.is_some() && !state.paused {
            state.paused = true;
            info!("[ch-04] paused");
        } else {
            warn!("[ch-04] pause with nothing playing");
        }
    }

    fn resume(&self) {
        let mut state = self.state.lock();
        if state.current.is_some() && state.paused {
            state.paused = false;
            info!("[ch-04] resumed");
        }
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        if state.current.take().is_some() {
            info!("[ch-04] stopped");
        }
        state.paused = false;
    }
}
