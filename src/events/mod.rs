//! Structured lifecycle event logging.
//!
//! This module emits the crate's observable events through the `tracing`
//! crate under the fixed target `scanloop::events`, so a host can route
//! them (JSON file, console, telemetry) independently of the rest of the
//! log stream.

mod emit;

pub use emit::{
    emit_acquisition_failed, emit_acquisition_running, emit_acquisition_started,
    emit_acquisition_stopped, emit_persist_failed, emit_retry_scheduled, emit_scan_recorded,
    emit_snapshot_rejected,
};
