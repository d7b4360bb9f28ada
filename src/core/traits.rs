//! Core traits for the scanloop library.
//!
//! This module defines the [`Detector`] trait implemented by external
//! barcode detection engines, and the event payloads those engines emit
//! while running.

use crate::core::error::DetectorError;
use crate::detector::DetectorConfig;

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::mpsc;

/// An event emitted by a running detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorEvent {
    /// A barcode was recognized and decoded.
    Detected {
        /// The decoded string payload.
        value: String,
    },

    /// A camera frame was processed, whether or not anything was decoded.
    ///
    /// Level-triggered: the first of these after a (re)start means the
    /// camera pipeline is live, so any loading indicator can be cleared.
    /// Consumers must treat repeats as idempotent.
    FrameProcessed,
}

/// The seam to an external barcode detection engine.
///
/// The engine owns the camera and the image-decoding algorithm; this crate
/// owns its lifecycle. Implementations must be `Send + Sync` and must never
/// panic; all failures are returned as [`DetectorError`].
///
/// # Contract
///
/// - `init` acquires the camera described by the config. It may be called
///   again after `stop` (the controller re-initializes on restart).
/// - `start` begins emitting [`DetectorEvent`]s on the provided channel and
///   returns immediately. Event production ends when `stop` is called or
///   the receiver is dropped.
/// - `stop` releases the camera. Calling it on a detector that was never
///   started is a no-op.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use scanloop::core::{Detector, DetectorEvent, DetectorError};
/// use scanloop::detector::DetectorConfig;
/// use async_trait::async_trait;
/// use tokio::sync::mpsc;
///
/// #[derive(Debug)]
/// struct CameraDetector;
///
/// #[async_trait]
/// impl Detector for CameraDetector {
///     fn name(&self) -> &str {
///         "camera"
///     }
///
///     async fn init(&self, config: &DetectorConfig) -> Result<(), DetectorError> {
///         // Acquire the camera with the given constraints...
///         Ok(())
///     }
///
///     async fn start(
///         &self,
///         events: mpsc::Sender<DetectorEvent>,
///     ) -> Result<(), DetectorError> {
///         // Spawn the capture loop, forwarding decodes to `events`...
///         Ok(())
///     }
///
///     async fn stop(&self) {
///         // Release the camera.
///     }
/// }
/// ```
#[async_trait]
pub trait Detector: Send + Sync + Debug {
    /// Returns the name of this detector engine.
    ///
    /// A stable, human-readable identifier used in logs and error reports.
    fn name(&self) -> &str;

    /// Initializes the engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError`] classified by cause:
    /// - `PermissionDenied` - camera access refused.
    /// - `DeviceNotFound` - no camera present.
    /// - `DeviceBusy` - camera held elsewhere.
    /// - `Init` - any other engine failure, with raw identity.
    async fn init(&self, config: &DetectorConfig) -> Result<(), DetectorError>;

    /// Starts detection, emitting events on `events`.
    ///
    /// Must only be called after a successful `init`. Returns once capture
    /// is running; events then arrive asynchronously.
    async fn start(&self, events: mpsc::Sender<DetectorEvent>) -> Result<(), DetectorError>;

    /// Stops detection and releases the camera.
    async fn stop(&self);
}

/// An arc-wrapped detector for shared ownership.
pub type ArcDetector = std::sync::Arc<dyn Detector>;
