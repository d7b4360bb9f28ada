//! Core types used throughout the scanloop library.
//!
//! This module defines the classified failure surface shown to the user
//! when acquisition gives up, and the application version descriptor.

use crate::core::error::DetectorError;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The classified kind of a terminal acquisition failure.
///
/// Mirrors the detector error taxonomy, collapsed to what the user can act
/// on once retries are exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Camera access denied by the user or browser policy.
    PermissionDenied,
    /// No camera device present.
    DeviceNotFound,
    /// Camera held by another application or unreadable.
    DeviceBusy,
    /// Anything else; the raw error identity is carried in the report.
    Other,
}

impl FailureKind {
    /// Classifies a detector error into a failure kind.
    pub fn from_error(error: &DetectorError) -> Self {
        match error {
            DetectorError::PermissionDenied { .. } => Self::PermissionDenied,
            DetectorError::DeviceNotFound { .. } => Self::DeviceNotFound,
            DetectorError::DeviceBusy { .. } => Self::DeviceBusy,
            DetectorError::Init { .. } | DetectorError::NotInitialized { .. } => Self::Other,
        }
    }

    /// Returns an actionable, user-facing advice line for this kind.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Camera access was denied. Allow camera access in your browser settings."
            }
            Self::DeviceNotFound => {
                "No camera was found. Check that a camera is connected to the device."
            }
            Self::DeviceBusy => {
                "The camera could not be opened. Check that no other application is using it."
            }
            Self::Other => "The camera could not be started.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::DeviceNotFound => write!(f, "device_not_found"),
            Self::DeviceBusy => write!(f, "device_busy"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A user-visible report produced when acquisition retries are exhausted.
///
/// This is the only failure the controller surfaces; everything else is
/// absorbed and retried or logged at its boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Classified failure kind.
    pub kind: FailureKind,
    /// Number of init attempts made, including the first.
    pub attempts: u32,
    /// Raw message from the last detector error.
    pub detail: String,
}

impl FailureReport {
    /// Builds a report from the last error seen and the attempt count.
    pub fn new(error: &DetectorError, attempts: u32) -> Self {
        Self {
            kind: FailureKind::from_error(error),
            attempts,
            detail: error.to_string(),
        }
    }

    /// Renders the full user-facing message: a fixed lead line, the
    /// kind-specific advice, and the raw detail.
    pub fn message(&self) -> String {
        format!(
            "Failed to start the camera.\n{}\n({})",
            self.kind.advice(),
            self.detail
        )
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "acquisition failed after {} attempts ({}): {}",
            self.attempts, self.kind, self.detail
        )
    }
}

/// Application version descriptor.
///
/// The patch segment is a date stamp (`YYYYMMDD`), so rebuilt front-ends
/// pick up a fresh version string without manual bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Date-stamped patch segment, `YYYYMMDD`.
    pub patch: u32,
}

impl AppVersion {
    /// Creates a version with the patch segment stamped from today's date.
    pub fn current(major: u32, minor: u32) -> Self {
        let today = Local::now().date_naive();
        Self {
            major,
            minor,
            patch: today.year() as u32 * 10_000 + today.month() * 100 + today.day(),
        }
    }

    /// Renders the full `major.minor.patch` string.
    pub fn full(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.full())
    }
}
