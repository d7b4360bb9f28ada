//! Basic acquisition example demonstrating the full detection pipeline.
//!
//! This example shows how to:
//! - Implement a presentation surface
//! - Build an `AcquisitionController` around a detector
//! - Watch decoded values land in the bounded history
//!
//! Run with: cargo run --example basic_scan

use scanloop::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// A presentation surface that renders to stdout.
#[derive(Debug)]
struct ConsoleSurface;

impl PresentationSurface for ConsoleSurface {
    fn show_code(&self, code: &str) {
        println!("  decoded: {}", code);
    }

    fn render_history(&self, records: &[ScanRecord]) {
        println!("  history ({} items):", records.len());
        for record in records {
            println!("    {} ({})", record.code, record.timestamp);
        }
    }

    fn set_loading(&self, visible: bool) {
        println!("  loading indicator: {}", if visible { "on" } else { "off" });
    }

    fn show_failure(&self, report: &FailureReport) {
        println!("  FAILURE: {}", report.message());
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Scanloop Basic Scan Example ===");
    println!("scanner {}", AppVersion::current(1, 0));
    println!();

    // The mock detector stands in for a real camera engine. It reports a
    // processed frame, then decodes a few badges -- including an immediate
    // duplicate that the history suppresses.
    let detector = Arc::new(MockDetector::new().with_name("demo-camera").with_events(vec![
        DetectorEvent::FrameProcessed,
        DetectorEvent::Detected {
            value: "EMP-0042".into(),
        },
    ]));

    let controller = scanloop::acquisition::AcquisitionControllerBuilder::from_arc(
        Arc::clone(&detector) as Arc<dyn Detector>,
    )
    .with_presentation(Arc::new(ConsoleSurface))
    .build()
    .await;

    println!("Starting acquisition...");
    controller.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Live detections, as if more badges passed the camera.
    for value in ["EMP-0042", "EMP-0099", "EMP-0042"] {
        detector
            .emit(DetectorEvent::Detected {
                value: value.into(),
            })
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    // Let the debounced refresh fire.
    tokio::time::sleep(Duration::from_millis(200)).await;

    println!();
    println!("Final history (newest first):");
    for record in controller.history().all() {
        println!("  {} ({})", record.code, record.timestamp);
    }
    println!("Note: the immediate duplicate was suppressed; the later");
    println!("re-scan of EMP-0042 was accepted (adjacent-only dedup).");

    controller.shutdown().await;
    println!("Stopped.");
}
