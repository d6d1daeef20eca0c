//! # Outbound Ports
//!
//! The audio output the server drives. Calls are fire-and-forget.

/// Playback device - outbound port.
pub trait PlaybackDevice: Send + Sync {
    /// Start playing a track, replacing whatever is playing.
    fn play(&self, file: &str, title: &str, artist: &str);

    /// Pause the current track.
    fn pause(&self);

    /// Resume a paused track.
    fn resume(&self);

    /// Stop and forget the current track.
    fn stop(&self);
}
