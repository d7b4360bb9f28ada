//! Presentation and feedback collaborator seams.
//!
//! The scanner front-end talks to a display surface (decoded-code readout,
//! history list, loading indicator, failure banner) and to optional
//! haptic/audio feedback. Both are trait seams here: the host shell brings
//! the DOM-or-whatever implementation, the library brings the calls.

use crate::core::error::FeedbackError;
use crate::core::types::FailureReport;
use crate::history::ScanRecord;

use std::fmt::Debug;
use std::time::Duration;

/// The display surface the scanner renders into.
///
/// Implementations wrap named elements of some concrete surface (DOM nodes,
/// TUI widgets). A missing element is a reportable condition inside the
/// implementation — log it and skip the update — never a panic; the
/// detection pipeline does not depend on any of these calls succeeding.
pub trait PresentationSurface: Send + Sync + Debug {
    /// Shows the most recently decoded value.
    fn show_code(&self, code: &str);

    /// Re-renders the history list, newest first.
    fn render_history(&self, records: &[ScanRecord]);

    /// Shows or hides the loading indicator.
    ///
    /// Level-triggered and idempotent; callers may repeat a state freely.
    fn set_loading(&self, visible: bool);

    /// Shows a terminal acquisition failure to the user.
    fn show_failure(&self, report: &FailureReport);
}

/// Haptic and audio feedback on successful detection.
///
/// Both channels are optional device capabilities: haptics are
/// feature-detected via [`supports_haptics`](Self::supports_haptics), and
/// either call may fail at runtime. Failures are absorbed by the caller.
pub trait FeedbackSink: Send + Sync + Debug {
    /// Returns `true` if the device can vibrate.
    fn supports_haptics(&self) -> bool {
        false
    }

    /// Pulses the vibration motor for `duration`.
    fn vibrate(&self, duration: Duration) -> Result<(), FeedbackError>;

    /// Plays a tone at `frequency_hz` for `duration`.
    fn beep(&self, frequency_hz: u32, duration: Duration) -> Result<(), FeedbackError>;
}

/// A presentation surface that renders nowhere.
///
/// Useful for headless tests and for hosts that only consume the history
/// store programmatically.
#[derive(Debug, Default)]
pub struct NullPresentation;

impl NullPresentation {
    /// Creates a new null surface.
    pub fn new() -> Self {
        Self
    }
}

impl PresentationSurface for NullPresentation {
    fn show_code(&self, _code: &str) {}

    fn render_history(&self, _records: &[ScanRecord]) {}

    fn set_loading(&self, _visible: bool) {}

    fn show_failure(&self, report: &FailureReport) {
        tracing::debug!(kind = %report.kind, "null surface: failure not shown");
    }
}

/// A feedback sink with no haptics and a silent beep.
#[derive(Debug, Default)]
pub struct NullFeedback;

impl NullFeedback {
    /// Creates a new null sink.
    pub fn new() -> Self {
        Self
    }
}

impl FeedbackSink for NullFeedback {
    fn vibrate(&self, _duration: Duration) -> Result<(), FeedbackError> {
        Err(FeedbackError::unavailable("haptics"))
    }

    fn beep(&self, _frequency_hz: u32, _duration: Duration) -> Result<(), FeedbackError> {
        Ok(())
    }
}
