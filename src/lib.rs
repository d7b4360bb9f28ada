//! # Scanloop
//!
//! The resilient core of a camera-fed barcode scanner front-end: a
//! lifecycle state machine around an external detection engine, and a
//! bounded, deduplicating, persisted scan history.
//!
//! ## Overview
//!
//! Scanloop wraps a black-box barcode detector's asynchronous init and
//! detection callbacks into a supervised acquisition loop, allowing you to:
//!
//! - Start the camera and recover from transient init failures with
//!   exponential backoff
//! - Classify terminal failures (permission denied, no device, device
//!   busy) into actionable user-facing reports
//! - Route every decoded value into a bounded scan history with
//!   back-to-back duplicate suppression and snapshot persistence
//! - Collapse detection bursts into a single debounced history refresh
//! - Fire best-effort haptic and audio feedback without ever stalling the
//!   detection pipeline
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scanloop::acquisition::AcquisitionController;
//! use scanloop::detector::MockDetector;
//!
//! #[tokio::main]
//! async fn main() {
//!     // A real integration implements the `Detector` trait around its
//!     // camera engine; the mock stands in for tests and demos.
//!     let detector = MockDetector::new();
//!
//!     let controller = AcquisitionController::builder(detector)
//!         .build()
//!         .await;
//!
//!     // Acquire the camera; retries and backoff happen inside.
//!     controller.start().await;
//!
//!     // ... detection events flow into the history store ...
//!
//!     controller.shutdown().await;
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Core**: fundamental types, the `Detector` trait, error taxonomy
//! - **Detector**: engine configuration and the mock implementation
//! - **Acquisition**: the pure session state machine, retry policy, and
//!   the controller that drives the engine
//! - **History**: the bounded deduplicating scan log and its storage seams
//! - **Surface**: presentation and feedback collaborator traits
//! - **Timer**: the single-slot timer shared by debounce and backoff
//! - **Events**: structured lifecycle logging

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod acquisition;
pub mod core;
pub mod detector;
pub mod events;
pub mod history;
pub mod surface;
pub mod timer;

// Re-export commonly used types at the crate root
pub use crate::core::{
    AppVersion, Detector, DetectorError, DetectorEvent, FailureKind, FailureReport,
};

pub use crate::acquisition::{
    AcquisitionConfig, AcquisitionController, AcquisitionState, RetryPolicy,
};
pub use crate::detector::{DetectorConfig, MockDetector};
pub use crate::history::{HistoryConfig, HistoryStore, RecordOutcome, ScanRecord};
pub use crate::surface::{FeedbackSink, PresentationSurface};

/// Prelude module for convenient imports.
///
/// ```rust
/// use scanloop::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{
        AcquisitionConfig, AcquisitionController, AcquisitionState, RetryPolicy,
    };
    pub use crate::core::{
        AppVersion, Detector, DetectorError, DetectorEvent, FailureKind, FailureReport,
    };
    pub use crate::detector::{DetectorConfig, MockDetector};
    pub use crate::history::{
        FileStorage, HistoryConfig, HistoryStore, MemoryStorage, RecordOutcome, ScanRecord,
        SnapshotStorage,
    };
    pub use crate::surface::{FeedbackSink, PresentationSurface};
}
