//! Backoff and recovery example.
//!
//! This example shows how the controller handles a camera that fails to
//! initialize: transient failures are retried with exponential backoff,
//! and exhausted retries surface a classified, actionable report.
//!
//! Run with: cargo run --example flaky_camera

use scanloop::acquisition::AcquisitionConfig;
use scanloop::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct ConsoleSurface;

impl PresentationSurface for ConsoleSurface {
    fn show_code(&self, code: &str) {
        println!("  decoded: {}", code);
    }

    fn render_history(&self, _records: &[ScanRecord]) {}

    fn set_loading(&self, visible: bool) {
        println!("  loading indicator: {}", if visible { "on" } else { "off" });
    }

    fn show_failure(&self, report: &FailureReport) {
        println!("  FAILURE after {} attempts:", report.attempts);
        for line in report.message().lines() {
            println!("    {}", line);
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Scanloop Flaky Camera Example ===\n");

    // Part 1: a camera that is busy twice, then comes free. The default
    // policy retries at 1000ms and 2000ms before the third init succeeds.
    println!("Camera busy twice, then recovering:");
    let detector = MockDetector::new()
        .with_name("flaky-camera")
        .fail_init_times(2, DetectorError::device_busy("held by another application"));

    let controller = AcquisitionController::builder(detector)
        .with_presentation(Arc::new(ConsoleSurface))
        .build()
        .await;

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(3500)).await;
    println!("  state: {}\n", controller.state().name());
    controller.shutdown().await;

    // Part 2: permission denied every time. A tighter backoff keeps the
    // demo short; the ladder still doubles per attempt.
    println!("Camera permission denied (retries exhausted):");
    let detector = MockDetector::new()
        .with_name("blocked-camera")
        .fail_init_times(10, DetectorError::permission_denied("denied by user"));

    let config = AcquisitionConfig::new()
        .with_retry(RetryPolicy::new().with_base_delay(Duration::from_millis(100)));

    let controller = AcquisitionController::builder(detector)
        .with_presentation(Arc::new(ConsoleSurface))
        .with_config(config)
        .build()
        .await;

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(1000)).await;
    println!("  state: {}", controller.state().name());
}
