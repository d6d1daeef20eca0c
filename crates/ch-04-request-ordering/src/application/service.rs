//! # Ordering Service
//!
//! Logs each playback request in timestamp order and services it at once.

use crate::config::OrderingConfig;
use crate::domain::{OrderingError, PendingLog, QueuedRequest, Track};
use crate::ports::{OrderingApi, PlaybackDevice};
use ch_01_logical_clock::LogicalClock;
use parking_lot::Mutex;
use shared_types::LogicalTimestamp;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordering service - implements [`OrderingApi`].
pub struct OrderingService<D: PlaybackDevice> {
    config: OrderingConfig,
    clock: Arc<LogicalClock>,
    pending: Mutex<PendingLog>,
    device: D,
}

impl<D: PlaybackDevice> OrderingService<D> {
    /// Create a service with a fresh clock.
    pub fn new(config: OrderingConfig, device: D) -> Self {
        let clock = Arc::new(LogicalClock::new(config.node_id.clone()));
        Self::with_clock(config, device, clock)
    }

    /// Create a service around an existing clock, e.g. one shared with
    /// other roles on the same node.
    pub fn with_clock(config: OrderingConfig, device: D, clock: Arc<LogicalClock>) -> Self {
        let pending = Mutex::new(PendingLog::new(config.max_pending));
        Self {
            config,
            clock,
            pending,
            device,
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &OrderingConfig {
        &self.config
    }

    /// Shared handle to the clock.
    pub fn clock_handle(&self) -> Arc<LogicalClock> {
        Arc::clone(&self.clock)
    }

    /// The playback device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Pause whatever is playing.
    pub fn pause(&self) {
        self.device.pause();
    }

    /// Resume after [`pause`](Self::pause).
    pub fn resume(&self) {
        self.device.resume();
    }

    /// Stop playback.
    pub fn halt(&self) {
        self.device.stop();
    }
}

impl<D: PlaybackDevice> OrderingApi for OrderingService<D> {
    fn clock(&self) -> &LogicalClock {
        &self.clock
    }

    fn accept(&self, song: String, timestamp: LogicalTimestamp) -> Result<String, OrderingError> {
        if song.trim().is_empty() {
            return Err(OrderingError::EmptySong);
        }

        let request = QueuedRequest {
            timestamp,
            song,
            received_at: self.clock.snapshot(),
        };
        let track = Track::from_song(&request.song);
        let message = format!("Playing song: {}", request.song);
        info!(
            from = %request.requester(),
            timestamp = %request.timestamp,
            song = %request.song,
            "[ch-04] playback request"
        );

        let (position, evicted) = {
            let mut pending = self.pending.lock();
            let evicted = pending.insert(request.clone());
            let position = pending
                .entries()
                .iter()
                .position(|e| e == &request)
                .unwrap_or_default();
            (position, evicted)
        };
        if let Some(old) = evicted {
            debug!(timestamp = %old.timestamp, "[ch-04] pending log full, oldest evicted");
        }
        debug!(position, "[ch-04] request logged");

        self.device.play(&track.file, &track.title, &track.artist);
        Ok(message)
    }

    fn pending(&self) -> Vec<QueuedRequest> {
        self.pending.lock().entries().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::mocks::{DeviceCall, RecordingDevice};

    fn service() -> OrderingService<RecordingDevice> {
        OrderingService::new(OrderingConfig::for_testing(), RecordingDevice::new())
    }

    #[test]
    fn test_accept_services_immediately() {
        let svc = service();
        let reply = svc
            .accept("Golden".into(), LogicalTimestamp::new(1, "CLIENT_1"))
            .unwrap();
        assert_eq!(reply, "Playing song: Golden");
        assert_eq!(svc.device().calls(), vec![DeviceCall::Play("Golden".into())]);
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let svc = service();
        svc.accept("b".into(), LogicalTimestamp::new(3, "B")).unwrap();
        svc.accept("a".into(), LogicalTimestamp::new(1, "A")).unwrap();
        svc.accept("c".into(), LogicalTimestamp::new(2, "C")).unwrap();

        let songs: Vec<_> = svc.pending().into_iter().map(|r| r.song).collect();
        assert_eq!(songs, vec!["a", "c", "b"]);
        // serviced on arrival, not in log order
        assert_eq!(
            svc.device().calls(),
            vec![
                DeviceCall::Play("b".into()),
                DeviceCall::Play("a".into()),
                DeviceCall::Play("c".into()),
            ]
        );
    }

    #[test]
    fn test_empty_song_rejected() {
        let svc = service();
        let err = svc.accept("  ".into(), LogicalTimestamp::new(1, "A")).unwrap_err();
        assert!(matches!(err, OrderingError::EmptySong));
        assert!(svc.pending().is_empty());
        assert!(svc.device().calls().is_empty());
    }

    #[test]
    fn test_log_bounded_by_config() {
        let svc = service();
        for n in 0..20 {
            svc.accept(format!("s{n}"), LogicalTimestamp::new(n, "A")).unwrap();
        }
        let pending = svc.pending();
        assert_eq!(pending.len(), svc.config().max_pending);
        assert_eq!(pending[0].timestamp.counter, 12);
    }

    #[test]
    fn test_device_controls_pass_through() {
        let svc = service();
        svc.pause();
        svc.resume();
        svc.halt();
        assert_eq!(
            svc.device().calls(),
            vec![DeviceCall::Pause, DeviceCall::Resume, DeviceCall::Stop]
        );
    }
}
