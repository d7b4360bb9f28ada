//! Bounded, deduplicating, persisted scan history.
//!
//! The store keeps the most recent scans newest-first, suppresses
//! back-to-back duplicates, persists a JSON snapshot through the
//! [`SnapshotStorage`] seam, and debounces presentation refreshes so a
//! burst of detections renders once.

mod filesystem;
mod record;
mod store;
mod traits;

pub use filesystem::FileStorage;
pub use record::ScanRecord;
pub use store::{HistoryConfig, HistoryStore, RecordOutcome};
pub use traits::{MemoryStorage, SnapshotStorage};
