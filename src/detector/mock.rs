//! Mock detector for testing.
//!
//! This module provides a configurable mock detector that can be used in
//! tests and demos to simulate camera acquisition and barcode detection
//! without a real engine or camera.

use crate::core::{Detector, DetectorError, DetectorEvent};
use crate::detector::DetectorConfig;

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::RwLock;
use tokio::sync::mpsc;

/// A mock detector for testing purposes.
///
/// The mock can be scripted to fail initialization a fixed number of times
/// before succeeding (exercising the retry path), to emit a canned event
/// sequence on start, and to accept live event injection via
/// [`emit`](Self::emit).
///
/// # Examples
///
/// ```rust,ignore
/// use scanloop::detector::MockDetector;
/// use scanloop::core::{DetectorError, DetectorEvent};
///
/// // A detector whose camera is busy twice, then recovers
/// let detector = MockDetector::new()
///     .fail_init_times(2, DetectorError::device_busy("held by another app"));
///
/// // A detector that decodes one badge as soon as it starts
/// let detector = MockDetector::new().with_events(vec![
///     DetectorEvent::FrameProcessed,
///     DetectorEvent::Detected { value: "A1B2C3".into() },
/// ]);
/// ```
#[derive(Debug)]
pub struct MockDetector {
    /// Name of this detector instance.
    name: String,
    /// Remaining scripted init failures.
    init_failures_left: AtomicU32,
    /// Error returned while init failures remain.
    init_error: RwLock<DetectorError>,
    /// Events flushed to the channel when `start` is called.
    scripted_events: RwLock<Vec<DetectorEvent>>,
    /// Live event channel, present while started.
    live_sender: RwLock<Option<mpsc::Sender<DetectorEvent>>>,
    /// Config captured by the last successful `init`.
    last_config: RwLock<Option<DetectorConfig>>,
    /// Whether `init` has succeeded since the last `stop`.
    initialized: AtomicBool,
    /// Counter for init attempts.
    init_count: AtomicU32,
    /// Counter for starts.
    start_count: AtomicU32,
    /// Counter for stops.
    stop_count: AtomicU32,
}

impl MockDetector {
    /// Creates a mock detector that initializes successfully and emits
    /// nothing until events are injected.
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            init_failures_left: AtomicU32::new(0),
            init_error: RwLock::new(DetectorError::device_busy("scripted failure")),
            scripted_events: RwLock::new(Vec::new()),
            live_sender: RwLock::new(None),
            last_config: RwLock::new(None),
            initialized: AtomicBool::new(false),
            init_count: AtomicU32::new(0),
            start_count: AtomicU32::new(0),
            stop_count: AtomicU32::new(0),
        }
    }

    /// Sets the name of this detector.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Scripts the next `count` init calls to fail with `error`.
    pub fn fail_init_times(self, count: u32, error: DetectorError) -> Self {
        self.init_failures_left.store(count, Ordering::SeqCst);
        *self
            .init_error
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = error;
        self
    }

    /// Sets the events flushed to the channel when `start` is called.
    pub fn with_events(self, events: Vec<DetectorEvent>) -> Self {
        *self
            .scripted_events
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = events;
        self
    }

    /// Injects a live event, as if the camera had just processed a frame.
    ///
    /// Returns `false` if the detector is not started or the consumer is
    /// gone.
    pub async fn emit(&self, event: DetectorEvent) -> bool {
        let sender = self
            .live_sender
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        match sender {
            Some(sender) => sender.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Returns the number of init attempts made.
    pub fn init_count(&self) -> u32 {
        self.init_count.load(Ordering::SeqCst)
    }

    /// Returns the number of times `start` was called.
    pub fn start_count(&self) -> u32 {
        self.start_count.load(Ordering::SeqCst)
    }

    /// Returns the number of times `stop` was called.
    pub fn stop_count(&self) -> u32 {
        self.stop_count.load(Ordering::SeqCst)
    }

    /// Returns the config captured by the last successful init.
    pub fn last_config(&self) -> Option<DetectorConfig> {
        self.last_config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns `true` if the detector is currently initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Detector for MockDetector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&self, config: &DetectorConfig) -> Result<(), DetectorError> {
        self.init_count.fetch_add(1, Ordering::SeqCst);

        let failures_left = self.init_failures_left.load(Ordering::SeqCst);
        if failures_left > 0 {
            self.init_failures_left
                .store(failures_left - 1, Ordering::SeqCst);
            return Err(self
                .init_error
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone());
        }

        *self
            .last_config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(config.clone());
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn start(&self, events: mpsc::Sender<DetectorEvent>) -> Result<(), DetectorError> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(DetectorError::NotInitialized {
                detector: self.name.clone(),
            });
        }

        self.start_count.fetch_add(1, Ordering::SeqCst);

        let scripted: Vec<DetectorEvent> = self
            .scripted_events
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for event in scripted {
            if events.send(event).await.is_err() {
                break;
            }
        }

        *self
            .live_sender
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(events);
        Ok(())
    }

    async fn stop(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        self.initialized.store(false, Ordering::SeqCst);
        *self
            .live_sender
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_init_succeeds_by_default() {
        let detector = MockDetector::new();
        let config = DetectorConfig::default();

        assert!(detector.init(&config).await.is_ok());
        assert!(detector.is_initialized());
        assert_eq!(detector.init_count(), 1);
        assert_eq!(detector.last_config(), Some(config));
    }

    #[tokio::test]
    async fn test_mock_scripted_init_failures() {
        let detector =
            MockDetector::new().fail_init_times(2, DetectorError::device_busy("in use"));
        let config = DetectorConfig::default();

        assert!(matches!(
            detector.init(&config).await,
            Err(DetectorError::DeviceBusy { .. })
        ));
        assert!(matches!(
            detector.init(&config).await,
            Err(DetectorError::DeviceBusy { .. })
        ));
        assert!(detector.init(&config).await.is_ok());
        assert_eq!(detector.init_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_start_requires_init() {
        let detector = MockDetector::new();
        let (tx, _rx) = mpsc::channel(4);

        let result = detector.start(tx).await;
        assert!(matches!(result, Err(DetectorError::NotInitialized { .. })));
    }

    #[tokio::test]
    async fn test_mock_flushes_scripted_events_and_accepts_live_ones() {
        let detector = MockDetector::new().with_events(vec![
            DetectorEvent::FrameProcessed,
            DetectorEvent::Detected {
                value: "A1B2C3".into(),
            },
        ]);
        detector.init(&DetectorConfig::default()).await.unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        detector.start(tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(DetectorEvent::FrameProcessed));
        assert_eq!(
            rx.recv().await,
            Some(DetectorEvent::Detected {
                value: "A1B2C3".into()
            })
        );

        assert!(detector.emit(DetectorEvent::FrameProcessed).await);
        assert_eq!(rx.recv().await, Some(DetectorEvent::FrameProcessed));

        detector.stop().await;
        assert!(!detector.emit(DetectorEvent::FrameProcessed).await);
        assert_eq!(detector.stop_count(), 1);
    }
}
