//! The acquisition controller.

use crate::acquisition::retry::RetryPolicy;
use crate::acquisition::session::{
    AcquisitionSession, AcquisitionState, SessionEffect, SessionEvent,
};
use crate::core::{ArcDetector, Detector, DetectorEvent};
use crate::detector::DetectorConfig;
use crate::history::{HistoryConfig, HistoryStore, MemoryStorage};
use crate::surface::{FeedbackSink, NullFeedback, NullPresentation, PresentationSurface};
use crate::timer::SingleSlotTimer;

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Tone played on a successful detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeepSettings {
    /// Tone frequency in hertz.
    pub frequency_hz: u32,
    /// Tone duration.
    pub duration: Duration,
}

impl Default for BeepSettings {
    fn default() -> Self {
        Self {
            frequency_hz: 800,
            duration: Duration::from_millis(100),
        }
    }
}

/// Configuration for the acquisition controller.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Configuration handed to the detector at init.
    pub detector: DetectorConfig,

    /// Init retry policy.
    pub retry: RetryPolicy,

    /// Delay between cleanup and restart on re-acquisition, giving the
    /// camera stack time to settle after a geometry change.
    pub restart_delay: Duration,

    /// Haptic pulse length on detection.
    pub haptic_pulse: Duration,

    /// Detection tone.
    pub beep: BeepSettings,

    /// Capacity of the detector event channel.
    pub event_buffer: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            retry: RetryPolicy::default(),
            restart_delay: Duration::from_millis(100),
            haptic_pulse: Duration::from_millis(200),
            beep: BeepSettings::default(),
            event_buffer: 32,
        }
    }
}

impl AcquisitionConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the detector configuration.
    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the restart delay.
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Sets the detection tone.
    pub fn with_beep(mut self, beep: BeepSettings) -> Self {
        self.beep = beep;
        self
    }
}

/// Builder for creating an [`AcquisitionController`].
pub struct AcquisitionControllerBuilder {
    detector: ArcDetector,
    history: Option<Arc<HistoryStore>>,
    presentation: Option<Arc<dyn PresentationSurface>>,
    feedback: Option<Arc<dyn FeedbackSink>>,
    config: AcquisitionConfig,
}

impl AcquisitionControllerBuilder {
    /// Creates a builder around the given detector.
    pub fn new<D: Detector + 'static>(detector: D) -> Self {
        Self::from_arc(Arc::new(detector))
    }

    /// Creates a builder around a detector wrapped in an `Arc`, for callers
    /// that keep their own handle to it.
    pub fn from_arc(detector: ArcDetector) -> Self {
        Self {
            detector,
            history: None,
            presentation: None,
            feedback: None,
            config: AcquisitionConfig::default(),
        }
    }

    /// Sets the history store.
    pub fn with_history(mut self, history: Arc<HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// Sets the presentation surface.
    pub fn with_presentation(mut self, presentation: Arc<dyn PresentationSurface>) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Sets the feedback sink.
    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AcquisitionConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the controller.
    ///
    /// Defaults: a [`NullPresentation`], a [`NullFeedback`], and a fresh
    /// in-memory history store rendering to the same presentation surface.
    pub async fn build(self) -> Arc<AcquisitionController> {
        let presentation: Arc<dyn PresentationSurface> = self
            .presentation
            .unwrap_or_else(|| Arc::new(NullPresentation::new()));

        let history = match self.history {
            Some(history) => history,
            None => Arc::new(
                HistoryStore::open(
                    Arc::new(MemoryStorage::new()),
                    Arc::clone(&presentation),
                    HistoryConfig::default(),
                )
                .await,
            ),
        };

        Arc::new(AcquisitionController {
            detector: self.detector,
            history,
            presentation,
            feedback: self
                .feedback
                .unwrap_or_else(|| Arc::new(NullFeedback::new())),
            config: self.config,
            session: Mutex::new(AcquisitionSession::new()),
            delay_timer: SingleSlotTimer::new(),
            pump: Mutex::new(None),
        })
    }
}

/// Owns the external detector's lifecycle and the detection-to-history
/// pipeline.
///
/// The controller feeds detector callbacks and timer expirations into the
/// pure [`AcquisitionSession`] machine and executes the effects it returns:
/// initializing the detector, backing off and retrying on classified init
/// failures, pumping detection events into the [`HistoryStore`] and the
/// presentation surface, and tearing the camera down on stop.
///
/// It is the sole owner of the detector; every `init`/`start`/`stop` runs
/// on a single callback chain, so lifecycle calls never overlap.
pub struct AcquisitionController {
    /// The external detection engine.
    detector: ArcDetector,
    /// Scan history.
    history: Arc<HistoryStore>,
    /// Display surface.
    presentation: Arc<dyn PresentationSurface>,
    /// Haptic/audio feedback.
    feedback: Arc<dyn FeedbackSink>,
    /// Configuration.
    config: AcquisitionConfig,
    /// The lifecycle state machine.
    session: Mutex<AcquisitionSession>,
    /// Single slot shared by the retry backoff and the restart delay;
    /// arming either replaces whatever was pending.
    delay_timer: SingleSlotTimer,
    /// The running event pump, if any.
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl AcquisitionController {
    /// Creates a builder around the given detector.
    pub fn builder<D: Detector + 'static>(detector: D) -> AcquisitionControllerBuilder {
        AcquisitionControllerBuilder::new(detector)
    }

    /// Returns the current session state.
    pub fn state(&self) -> AcquisitionState {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .state()
            .clone()
    }

    /// Returns the history store.
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Requests acquisition start.
    ///
    /// Drives init and, on classified failure, the backoff/retry chain.
    /// Returns once the session is running, retrying (with the timer
    /// armed), or terminally failed; a stray call while already active is
    /// a no-op.
    pub async fn start(self: &Arc<Self>) {
        self.dispatch(SessionEvent::StartRequested).await;
    }

    /// Tears the session down: stops the detector, cancels pending timers,
    /// clears the loading indicator.
    ///
    /// Wire this to page-unload-style teardown in the host shell.
    pub async fn shutdown(self: &Arc<Self>) {
        self.dispatch(SessionEvent::StopRequested).await;
    }

    /// Stops the detector, then restarts after the configured delay.
    ///
    /// Wire this to orientation changes: the camera is re-acquired with the
    /// device's updated geometry.
    pub async fn reacquire(self: &Arc<Self>) {
        self.dispatch(SessionEvent::StopRequested).await;

        let controller = Arc::clone(self);
        self.delay_timer
            .schedule(self.config.restart_delay, async move {
                controller.dispatch(SessionEvent::StartRequested).await;
            });
    }

    /// Feeds an event through the machine, executing effects until the
    /// chain settles.
    ///
    /// Returns a boxed future: the effect chain can re-arm a timer whose
    /// action dispatches again, so the future is indirectly recursive and
    /// must be boxed to have a nameable `Send` type.
    fn dispatch(
        self: &Arc<Self>,
        event: SessionEvent,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let mut next = Some(event);
            while let Some(event) = next.take() {
                let effect = {
                    let mut session = self
                        .session
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    session.apply(event, &self.config.retry)
                };

                if let Some(effect) = effect {
                    next = self.execute(effect).await;
                }
            }
        })
    }

    /// Executes one effect, returning the follow-up event it produced.
    async fn execute(self: &Arc<Self>, effect: SessionEffect) -> Option<SessionEvent> {
        match effect {
            SessionEffect::BeginInit => {
                self.presentation.set_loading(true);

                let attempt = {
                    let session = self
                        .session
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    session.retry_count() + 1
                };
                crate::events::emit_acquisition_started(self.detector.name(), attempt);

                match self.detector.init(&self.config.detector).await {
                    Ok(()) => Some(SessionEvent::InitSucceeded),
                    Err(error) => {
                        tracing::warn!(
                            detector = self.detector.name(),
                            error = %error,
                            "Detector init failed"
                        );
                        Some(SessionEvent::InitFailed(error))
                    }
                }
            }

            SessionEffect::StartDetector { recovered_after } => {
                crate::events::emit_acquisition_running(self.detector.name(), recovered_after);

                let (sender, receiver) = mpsc::channel(self.config.event_buffer);
                match self.detector.start(sender).await {
                    Ok(()) => {
                        self.spawn_pump(receiver);
                        None
                    }
                    Err(error) => {
                        tracing::warn!(
                            detector = self.detector.name(),
                            error = %error,
                            "Detector start failed, tearing down"
                        );
                        Some(SessionEvent::StopRequested)
                    }
                }
            }

            SessionEffect::ScheduleRetry { attempt, delay } => {
                crate::events::emit_retry_scheduled(
                    self.detector.name(),
                    attempt,
                    self.config.retry.max_attempts,
                    delay,
                );

                let controller = Arc::clone(self);
                self.delay_timer.schedule(delay, async move {
                    controller.dispatch(SessionEvent::RetryElapsed).await;
                });
                None
            }

            SessionEffect::ReportFailure(report) => {
                crate::events::emit_acquisition_failed(self.detector.name(), &report);
                self.presentation.show_failure(&report);
                self.presentation.set_loading(false);
                None
            }

            SessionEffect::StopDetector => {
                self.delay_timer.cancel();
                if let Some(pump) = self
                    .pump
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .take()
                {
                    pump.abort();
                }

                self.detector.stop().await;
                self.presentation.set_loading(false);
                crate::events::emit_acquisition_stopped(self.detector.name());
                None
            }
        }
    }

    /// Spawns the task that drains detector events into the pipeline.
    fn spawn_pump(self: &Arc<Self>, mut receiver: mpsc::Receiver<DetectorEvent>) {
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                controller.handle_detector_event(event).await;
            }
        });

        let previous = self
            .pump
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Routes one detector event.
    async fn handle_detector_event(&self, event: DetectorEvent) {
        match event {
            DetectorEvent::Detected { value } => {
                if value.trim().is_empty() {
                    tracing::debug!("Ignored detection with empty payload");
                    return;
                }

                self.presentation.show_code(value.trim());
                self.history.record(&value).await;
                self.pulse_feedback();
            }

            // Level-triggered: the camera pipeline is live, so whatever
            // loading state is showing can go. Repeats are harmless.
            DetectorEvent::FrameProcessed => {
                self.presentation.set_loading(false);
            }
        }
    }

    /// Fires the detection side effects. Both are best-effort: failures are
    /// logged and the pipeline continues.
    fn pulse_feedback(&self) {
        if self.feedback.supports_haptics() {
            if let Err(error) = self.feedback.vibrate(self.config.haptic_pulse) {
                tracing::warn!(error = %error, "Haptic pulse failed");
            }
        }

        if let Err(error) = self
            .feedback
            .beep(self.config.beep.frequency_hz, self.config.beep.duration)
        {
            tracing::warn!(error = %error, "Beep failed");
        }
    }
}

impl std::fmt::Debug for AcquisitionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquisitionController")
            .field("detector", &self.detector.name())
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DetectorError, FailureKind, FailureReport};
    use crate::detector::MockDetector;
    use crate::history::ScanRecord;

    /// Presentation stub recording every call.
    #[derive(Debug, Default)]
    struct RecordingSurface {
        codes: Mutex<Vec<String>>,
        loading: Mutex<Vec<bool>>,
        failures: Mutex<Vec<FailureReport>>,
    }

    impl RecordingSurface {
        fn codes(&self) -> Vec<String> {
            self.codes.lock().unwrap().clone()
        }

        fn last_loading(&self) -> Option<bool> {
            self.loading.lock().unwrap().last().copied()
        }

        fn failures(&self) -> Vec<FailureReport> {
            self.failures.lock().unwrap().clone()
        }
    }

    impl PresentationSurface for RecordingSurface {
        fn show_code(&self, code: &str) {
            self.codes.lock().unwrap().push(code.to_string());
        }

        fn render_history(&self, _records: &[ScanRecord]) {}

        fn set_loading(&self, visible: bool) {
            self.loading.lock().unwrap().push(visible);
        }

        fn show_failure(&self, report: &FailureReport) {
            self.failures.lock().unwrap().push(report.clone());
        }
    }

    /// Feedback stub with configurable haptics support and beep failure.
    #[derive(Debug, Default)]
    struct RecordingFeedback {
        haptics: bool,
        fail_beep: bool,
        vibrations: Mutex<Vec<Duration>>,
        beeps: Mutex<Vec<(u32, Duration)>>,
    }

    impl FeedbackSink for RecordingFeedback {
        fn supports_haptics(&self) -> bool {
            self.haptics
        }

        fn vibrate(&self, duration: Duration) -> Result<(), crate::core::FeedbackError> {
            self.vibrations.lock().unwrap().push(duration);
            Ok(())
        }

        fn beep(
            &self,
            frequency_hz: u32,
            duration: Duration,
        ) -> Result<(), crate::core::FeedbackError> {
            if self.fail_beep {
                return Err(crate::core::FeedbackError::playback("no audio context"));
            }
            self.beeps.lock().unwrap().push((frequency_hz, duration));
            Ok(())
        }
    }

    /// Lets spawned pump/timer tasks run under a paused clock.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    fn busy() -> DetectorError {
        DetectorError::device_busy("held by another app")
    }

    #[tokio::test(start_paused = true)]
    async fn test_clean_start_runs_detection_pipeline() {
        let detector = MockDetector::new().with_events(vec![
            DetectorEvent::FrameProcessed,
            DetectorEvent::Detected {
                value: "A1B2C3".into(),
            },
        ]);
        let surface = Arc::new(RecordingSurface::default());
        let feedback = Arc::new(RecordingFeedback {
            haptics: true,
            ..Default::default()
        });

        let controller = AcquisitionController::builder(detector)
            .with_presentation(Arc::clone(&surface) as Arc<dyn PresentationSurface>)
            .with_feedback(Arc::clone(&feedback) as Arc<dyn FeedbackSink>)
            .build()
            .await;

        controller.start().await;
        settle().await;

        assert!(controller.state().is_running());
        assert_eq!(surface.codes(), vec!["A1B2C3"]);
        assert_eq!(surface.last_loading(), Some(false));

        let history = controller.history().all();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].code, "A1B2C3");

        assert_eq!(
            feedback.vibrations.lock().unwrap().clone(),
            vec![Duration::from_millis(200)]
        );
        assert_eq!(
            feedback.beeps.lock().unwrap().clone(),
            vec![(800, Duration::from_millis(100))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_with_backoff_then_recovers() {
        let detector = MockDetector::new().fail_init_times(2, busy());
        let controller = AcquisitionController::builder(detector).build().await;

        controller.start().await;
        assert_eq!(controller.state(), AcquisitionState::Retrying { attempt: 1 });

        // First retry fires after 1000ms and fails again.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(controller.state(), AcquisitionState::Retrying { attempt: 2 });

        // Second retry fires after 2000ms more and succeeds.
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(controller.state().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_is_not_early() {
        let detector = MockDetector::new().fail_init_times(1, busy());
        let controller = AcquisitionController::builder(detector).build().await;

        controller.start().await;
        assert_eq!(controller.state(), AcquisitionState::Retrying { attempt: 1 });

        // 900ms in, the 1000ms backoff has not elapsed.
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(controller.state(), AcquisitionState::Retrying { attempt: 1 });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(controller.state().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_classified_failure() {
        let detector =
            MockDetector::new().fail_init_times(4, DetectorError::permission_denied("denied"));
        let surface = Arc::new(RecordingSurface::default());

        let controller = AcquisitionController::builder(detector)
            .with_presentation(Arc::clone(&surface) as Arc<dyn PresentationSurface>)
            .build()
            .await;

        controller.start().await;
        // Walk through the full backoff ladder: 1000 + 2000 + 4000.
        tokio::time::sleep(Duration::from_millis(7500)).await;

        assert!(controller.state().is_failed());
        let failures = surface.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::PermissionDenied);
        assert_eq!(failures[0].attempts, 4);
        assert_eq!(surface.last_loading(), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_scheduled_after_terminal_failure() {
        let detector = Arc::new(MockDetector::new().fail_init_times(10, busy()));
        let controller = AcquisitionControllerBuilder::from_arc(
            Arc::clone(&detector) as ArcDetector
        )
        .build()
        .await;

        controller.start().await;
        tokio::time::sleep(Duration::from_millis(7500)).await;
        assert!(controller.state().is_failed());

        // The initial attempt plus three retries, then nothing more —
        // long after failure, no further init attempts have been made.
        assert_eq!(detector.init_count(), 4);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(detector.init_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_detector_and_clears_loading() {
        let detector = MockDetector::new();
        let surface = Arc::new(RecordingSurface::default());

        let controller = AcquisitionController::builder(detector)
            .with_presentation(Arc::clone(&surface) as Arc<dyn PresentationSurface>)
            .build()
            .await;

        controller.start().await;
        assert!(controller.state().is_running());

        controller.shutdown().await;
        assert!(controller.state().is_stopped());
        assert_eq!(surface.last_loading(), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reacquire_restarts_after_delay() {
        let detector = Arc::new(MockDetector::new());
        let controller = AcquisitionControllerBuilder::from_arc(
            Arc::clone(&detector) as ArcDetector
        )
        .build()
        .await;

        controller.start().await;
        assert!(controller.state().is_running());

        controller.reacquire().await;
        assert!(controller.state().is_stopped());
        assert_eq!(detector.stop_count(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(controller.state().is_running());
        // The camera was re-acquired from scratch.
        assert_eq!(detector.init_count(), 2);
        assert_eq!(detector.start_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_retry() {
        let detector = MockDetector::new().fail_init_times(10, busy());
        let controller = AcquisitionController::builder(detector).build().await;

        controller.start().await;
        assert!(controller.state().is_retrying());

        controller.shutdown().await;
        assert!(controller.state().is_stopped());

        // The cancelled backoff timer never revives the session.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(controller.state().is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_detection_payload_is_ignored() {
        let detector = MockDetector::new().with_events(vec![DetectorEvent::Detected {
            value: "   ".into(),
        }]);
        let surface = Arc::new(RecordingSurface::default());

        let controller = AcquisitionController::builder(detector)
            .with_presentation(Arc::clone(&surface) as Arc<dyn PresentationSurface>)
            .build()
            .await;

        controller.start().await;
        settle().await;

        assert!(surface.codes().is_empty());
        assert!(controller.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_failure_does_not_abort_pipeline() {
        let detector = MockDetector::new().with_events(vec![DetectorEvent::Detected {
            value: "A1B2C3".into(),
        }]);
        let feedback = Arc::new(RecordingFeedback {
            fail_beep: true,
            ..Default::default()
        });

        let controller = AcquisitionController::builder(detector)
            .with_feedback(Arc::clone(&feedback) as Arc<dyn FeedbackSink>)
            .build()
            .await;

        controller.start().await;
        settle().await;

        // The beep failed, the record still landed.
        assert_eq!(controller.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_noop() {
        let detector = MockDetector::new();
        let controller = AcquisitionController::builder(detector).build().await;

        controller.start().await;
        assert!(controller.state().is_running());
        controller.start().await;
        assert!(controller.state().is_running());
    }
}
