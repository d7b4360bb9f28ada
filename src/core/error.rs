//! Error types for the scanloop library.
//!
//! This module provides structured, typed errors for all failure scenarios.
//! The library never panics; all errors are returned as `Result` values or
//! absorbed at the boundary where they occur.

use thiserror::Error;

/// Error names reported by the external detector for a denied camera
/// permission. Browsers raise either depending on the blocking mechanism.
const PERMISSION_ERROR_NAMES: &[&str] = &["NotAllowedError", "SecurityError"];

/// Errors raised by the external detector during initialization or capture.
///
/// The detector collaborator reports failures as an error object carrying a
/// `name` field; [`DetectorError::from_name`] maps those names onto this
/// taxonomy so the controller can decide between retrying and surfacing an
/// actionable message.
#[derive(Debug, Clone, Error)]
pub enum DetectorError {
    /// Camera access was denied by the user or browser policy.
    ///
    /// Terminal for the session until the user changes the permission.
    #[error("camera access denied: {message}")]
    PermissionDenied {
        /// Message from the underlying detector.
        message: String,
    },

    /// No camera device is attached or visible to the detector.
    #[error("no camera device found: {message}")]
    DeviceNotFound {
        /// Message from the underlying detector.
        message: String,
    },

    /// The camera exists but could not be opened, typically because another
    /// application holds it. Often transient.
    #[error("camera device busy or unreadable: {message}")]
    DeviceBusy {
        /// Message from the underlying detector.
        message: String,
    },

    /// An unclassified initialization failure, reported with the raw error
    /// identity from the detector.
    #[error("detector init failed ({name}): {message}")]
    Init {
        /// Raw error name as reported by the detector.
        name: String,
        /// Message from the underlying detector.
        message: String,
    },

    /// The detector was asked to start or stop while not initialized.
    #[error("detector '{detector}' is not initialized")]
    NotInitialized {
        /// Name of the detector.
        detector: String,
    },
}

impl DetectorError {
    /// Classifies a raw detector error by its `name` field.
    ///
    /// Unrecognized names map to [`DetectorError::Init`], preserving the raw
    /// identity for reporting.
    pub fn from_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();

        if PERMISSION_ERROR_NAMES.contains(&name.as_str()) {
            Self::PermissionDenied { message }
        } else if name == "NotFoundError" {
            Self::DeviceNotFound { message }
        } else if name == "NotReadableError" {
            Self::DeviceBusy { message }
        } else {
            Self::Init { name, message }
        }
    }

    /// Creates a `PermissionDenied` error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Creates a `DeviceNotFound` error.
    pub fn device_not_found(message: impl Into<String>) -> Self {
        Self::DeviceNotFound {
            message: message.into(),
        }
    }

    /// Creates a `DeviceBusy` error.
    pub fn device_busy(message: impl Into<String>) -> Self {
        Self::DeviceBusy {
            message: message.into(),
        }
    }

    /// Returns `true` if this failure is plausibly transient and worth
    /// retrying within the backoff budget.
    ///
    /// Permission denials rarely resolve on their own, but the retry policy
    /// still applies uniformly: the user may grant access between attempts,
    /// and the attempt budget bounds the cost.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::NotInitialized { .. })
    }

    /// Returns the raw error name when one was preserved.
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            Self::Init { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Error type for snapshot storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading the stored snapshot failed.
    #[error("failed to read snapshot '{key}': {reason}")]
    ReadFailed {
        /// Storage key.
        key: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Writing the snapshot failed.
    #[error("failed to write snapshot '{key}': {reason}")]
    WriteFailed {
        /// Storage key.
        key: String,
        /// Reason for the failure.
        reason: String,
    },

    /// The stored snapshot exists but could not be deserialized.
    #[error("snapshot '{key}' is corrupt: {reason}")]
    Corrupt {
        /// Storage key.
        key: String,
        /// Reason the snapshot was rejected.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Creates a `ReadFailed` error.
    pub fn read_failed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `WriteFailed` error.
    pub fn write_failed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Corrupt` error.
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Error type for best-effort feedback operations (beep, haptics).
///
/// These never propagate past the controller; they are logged and the
/// detection pipeline continues.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The capability is not available on this device.
    #[error("feedback capability '{capability}' unavailable")]
    Unavailable {
        /// Name of the missing capability.
        capability: String,
    },

    /// The capability exists but playback failed.
    #[error("feedback playback failed: {reason}")]
    Playback {
        /// Reason for the failure.
        reason: String,
    },
}

impl FeedbackError {
    /// Creates an `Unavailable` error.
    pub fn unavailable(capability: impl Into<String>) -> Self {
        Self::Unavailable {
            capability: capability.into(),
        }
    }

    /// Creates a `Playback` error.
    pub fn playback(reason: impl Into<String>) -> Self {
        Self::Playback {
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for detector operations.
pub type DetectorResult<T> = Result<T, DetectorError>;

/// A specialized `Result` type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A specialized `Result` type for feedback operations.
pub type FeedbackResult<T> = Result<T, FeedbackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_classification() {
        let err = DetectorError::from_name("NotAllowedError", "denied by user");
        assert!(matches!(err, DetectorError::PermissionDenied { .. }));

        let err = DetectorError::from_name("SecurityError", "blocked by policy");
        assert!(matches!(err, DetectorError::PermissionDenied { .. }));

        let err = DetectorError::from_name("NotFoundError", "no device");
        assert!(matches!(err, DetectorError::DeviceNotFound { .. }));

        let err = DetectorError::from_name("NotReadableError", "device in use");
        assert!(matches!(err, DetectorError::DeviceBusy { .. }));
    }

    #[test]
    fn test_from_name_preserves_unknown_identity() {
        let err = DetectorError::from_name("OverconstrainedError", "no match");
        assert_eq!(err.raw_name(), Some("OverconstrainedError"));
        assert!(err.to_string().contains("OverconstrainedError"));
        assert!(err.to_string().contains("no match"));
    }

    #[test]
    fn test_is_transient() {
        assert!(DetectorError::device_busy("held by another app").is_transient());
        assert!(DetectorError::permission_denied("denied").is_transient());
        assert!(!DetectorError::NotInitialized {
            detector: "mock".into()
        }
        .is_transient());
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::corrupt("barcode_history", "unexpected EOF");
        assert!(err.to_string().contains("barcode_history"));
        assert!(err.to_string().contains("unexpected EOF"));
    }
}
