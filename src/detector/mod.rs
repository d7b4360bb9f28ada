//! Detector integrations.
//!
//! The external decoding engine is a black box behind the
//! [`Detector`](crate::core::Detector) trait; this module holds the
//! configuration it is initialized with and the mock implementation used
//! in tests and demos. Real engine bindings (a WASM bridge, a native
//! capture pipeline) implement the same trait out of tree.

mod config;
mod mock;

pub use config::{
    CameraConstraints, CameraFacing, Code39Options, DebugFlags, DetectorConfig, DimensionRange,
    Symbology,
};
pub use mock::MockDetector;
