//! The acquisition session state machine.
//!
//! The machine is pure: events go in, at most one effect comes out, and no
//! I/O happens here. The controller owns a session, feeds it detector
//! callbacks and timer expirations, and executes the effects — which keeps
//! every transition testable without a detector, a runtime, or a clock.

use crate::acquisition::retry::RetryPolicy;
use crate::core::error::DetectorError;
use crate::core::types::FailureReport;

use std::time::Duration;

/// The lifecycle state of the acquisition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionState {
    /// No start has been requested yet.
    Idle,

    /// Detector initialization is in flight.
    Initializing,

    /// The detector is initialized and emitting events.
    Running,

    /// An init attempt failed; a retry is scheduled.
    Retrying {
        /// Which retry is pending (1-indexed).
        attempt: u32,
    },

    /// Retries are exhausted. Terminal until an explicit restart.
    Failed,

    /// Explicitly stopped (teardown or pre-restart cleanup).
    Stopped,
}

impl AcquisitionState {
    /// Returns `true` if the session is idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns `true` if initialization is in flight.
    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    /// Returns `true` if the detector is running.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` if a retry is pending.
    pub fn is_retrying(&self) -> bool {
        matches!(self, Self::Retrying { .. })
    }

    /// Returns `true` if the session failed terminally.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns `true` if the session was stopped.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Retrying { .. } => "retrying",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
        }
    }
}

impl Default for AcquisitionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// An input to the state machine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A start (or restart) was requested.
    StartRequested,

    /// The detector's init callback reported success.
    InitSucceeded,

    /// The detector's init callback reported failure.
    InitFailed(DetectorError),

    /// The scheduled retry delay elapsed.
    RetryElapsed,

    /// Teardown was requested.
    StopRequested,
}

/// The side effect the controller must execute after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Call `init` on the detector.
    BeginInit,

    /// Init succeeded: start the detector and its event pump.
    ///
    /// `recovered_after` is the number of failed retries preceding this
    /// success, zero on a clean start.
    StartDetector {
        /// Failed retries before this success.
        recovered_after: u32,
    },

    /// Arm the retry timer; feed `RetryElapsed` back in when it fires.
    ScheduleRetry {
        /// Which retry this is (1-indexed).
        attempt: u32,
        /// Backoff delay before the retry.
        delay: Duration,
    },

    /// Retries exhausted: stop and surface the report.
    ReportFailure(FailureReport),

    /// Stop the detector and release the camera.
    StopDetector,
}

/// The transient acquisition session: current state plus the retry budget
/// spent so far. Not persisted.
#[derive(Debug, Default)]
pub struct AcquisitionSession {
    state: AcquisitionState,
    retry_count: u32,
}

impl AcquisitionSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> &AcquisitionState {
        &self.state
    }

    /// Returns the number of retries spent since the last success.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Applies an event, advancing the state and returning the effect the
    /// controller must execute, if any.
    ///
    /// Events that make no sense in the current state (a stray init
    /// callback after teardown, a stale timer firing) are dropped — the
    /// single-slot timers make most of these unreachable, but a black-box
    /// detector can surface callbacks late.
    pub fn apply(&mut self, event: SessionEvent, policy: &RetryPolicy) -> Option<SessionEffect> {
        match (&self.state, event) {
            (
                AcquisitionState::Idle | AcquisitionState::Stopped | AcquisitionState::Failed,
                SessionEvent::StartRequested,
            ) => {
                self.state = AcquisitionState::Initializing;
                Some(SessionEffect::BeginInit)
            }

            (AcquisitionState::Initializing, SessionEvent::InitSucceeded) => {
                let recovered_after = self.retry_count;
                self.retry_count = 0;
                self.state = AcquisitionState::Running;
                Some(SessionEffect::StartDetector { recovered_after })
            }

            (AcquisitionState::Initializing, SessionEvent::InitFailed(error)) => {
                if policy.should_retry(self.retry_count) {
                    self.retry_count += 1;
                    let attempt = self.retry_count;
                    self.state = AcquisitionState::Retrying { attempt };
                    Some(SessionEffect::ScheduleRetry {
                        attempt,
                        delay: policy.delay_for_attempt(attempt),
                    })
                } else {
                    self.state = AcquisitionState::Failed;
                    // Attempts = the initial try plus every retry.
                    let attempts = self.retry_count + 1;
                    Some(SessionEffect::ReportFailure(FailureReport::new(
                        &error, attempts,
                    )))
                }
            }

            (AcquisitionState::Retrying { .. }, SessionEvent::RetryElapsed) => {
                self.state = AcquisitionState::Initializing;
                Some(SessionEffect::BeginInit)
            }

            (
                AcquisitionState::Initializing
                | AcquisitionState::Running
                | AcquisitionState::Retrying { .. },
                SessionEvent::StopRequested,
            ) => {
                self.state = AcquisitionState::Stopped;
                Some(SessionEffect::StopDetector)
            }

            (AcquisitionState::Idle | AcquisitionState::Failed, SessionEvent::StopRequested) => {
                self.state = AcquisitionState::Stopped;
                None
            }

            // Everything else is a stale or out-of-order event.
            (state, event) => {
                tracing::debug!(
                    state = state.name(),
                    event = ?event,
                    "Dropped out-of-order session event"
                );
                None
            }
        }
    }
}
