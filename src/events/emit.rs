//! Event emission functions.

use crate::core::types::FailureReport;

use std::time::Duration;

/// Emits an event for an acquisition attempt starting.
pub fn emit_acquisition_started(detector: &str, attempt: u32) {
    tracing::info!(
        target: "scanloop::events",
        event_type = "acquisition_started",
        detector = %detector,
        attempt = attempt,
        "Acquisition attempt started"
    );
}

/// Emits an event for a successful detector initialization.
///
/// `recovered_after` is the number of failed attempts preceding this
/// success, zero on a clean start.
pub fn emit_acquisition_running(detector: &str, recovered_after: u32) {
    tracing::info!(
        target: "scanloop::events",
        event_type = "acquisition_running",
        detector = %detector,
        recovered_after = recovered_after,
        "Detector initialized and running"
    );
}

/// Emits an event for a scheduled retry after an init failure.
pub fn emit_retry_scheduled(detector: &str, attempt: u32, max_attempts: u32, delay: Duration) {
    tracing::warn!(
        target: "scanloop::events",
        event_type = "retry_scheduled",
        detector = %detector,
        attempt = attempt,
        max_attempts = max_attempts,
        delay_ms = delay.as_millis() as u64,
        "Init failed, retry scheduled"
    );
}

/// Emits an event for a terminal acquisition failure.
///
/// One of the two user-visible failure surfaces of the crate.
pub fn emit_acquisition_failed(detector: &str, report: &FailureReport) {
    tracing::error!(
        target: "scanloop::events",
        event_type = "acquisition_failed",
        detector = %detector,
        kind = %report.kind,
        attempts = report.attempts,
        detail = %report.detail,
        "Acquisition failed, retries exhausted"
    );
}

/// Emits an event for a stopped acquisition session.
pub fn emit_acquisition_stopped(detector: &str) {
    tracing::info!(
        target: "scanloop::events",
        event_type = "acquisition_stopped",
        detector = %detector,
        "Detector stopped"
    );
}

/// Emits an event for an accepted scan.
pub fn emit_scan_recorded(code: &str, log_len: usize) {
    tracing::info!(
        target: "scanloop::events",
        event_type = "scan_recorded",
        code = %code,
        log_len = log_len,
        "Scan recorded"
    );
}

/// Emits an event for a rejected persisted snapshot.
///
/// The other user-visible failure surface: the stored history could not be
/// read back and an empty log was substituted.
pub fn emit_snapshot_rejected(key: &str, reason: &str) {
    tracing::warn!(
        target: "scanloop::events",
        event_type = "snapshot_rejected",
        key = %key,
        reason = %reason,
        "Persisted history rejected, starting empty"
    );
}

/// Emits an event for a failed snapshot write.
pub fn emit_persist_failed(key: &str, reason: &str) {
    tracing::warn!(
        target: "scanloop::events",
        event_type = "persist_failed",
        key = %key,
        reason = %reason,
        "History snapshot write failed"
    );
}
