//! Scan record types.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp rendering used for captured records.
///
/// The rendered string is what gets persisted, so the format is part of the
/// snapshot's stable surface.
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// One accepted scan: the decoded value and when it was captured.
///
/// Immutable once created. The timestamp is rendered at capture time rather
/// than stored as an instant — the history list displays it verbatim and
/// round-trips it through the snapshot unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// The decoded barcode value, non-empty and trimmed.
    pub code: String,
    /// Capture time, rendered as local `YYYY/MM/DD HH:MM:SS`.
    pub timestamp: String,
}

impl ScanRecord {
    /// Creates a record for `code` captured now.
    ///
    /// The caller is responsible for validation; the store rejects empty
    /// input before ever constructing a record.
    pub fn captured_now(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Creates a record with an explicit timestamp, for deserialization
    /// and tests.
    pub fn with_timestamp(code: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            timestamp: timestamp.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_now_renders_timestamp() {
        let record = ScanRecord::captured_now("A1B2C3");
        assert_eq!(record.code, "A1B2C3");
        // YYYY/MM/DD HH:MM:SS
        assert_eq!(record.timestamp.len(), 19);
        assert_eq!(&record.timestamp[4..5], "/");
        assert_eq!(&record.timestamp[7..8], "/");
    }

    #[test]
    fn test_serde_roundtrip() {
        let record = ScanRecord::with_timestamp("A1B2C3", "2025/04/04 12:34:56");
        let json = serde_json::to_string(&record).unwrap();
        let back: ScanRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
