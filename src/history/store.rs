//! The scan history store.

use crate::core::error::StorageError;
use crate::history::record::ScanRecord;
use crate::history::traits::SnapshotStorage;
use crate::surface::PresentationSurface;
use crate::timer::SingleSlotTimer;

use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Configuration for the history store.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of records kept; the oldest is evicted past this.
    pub max_items: usize,

    /// Quiet window for the debounced presentation refresh.
    pub refresh_debounce: Duration,

    /// Storage key the snapshot is persisted under.
    pub storage_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_items: 10,
            refresh_debounce: Duration::from_millis(100),
            storage_key: "barcode_history".to_string(),
        }
    }
}

impl HistoryConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of records kept.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items.max(1);
        self
    }

    /// Sets the refresh debounce window.
    pub fn with_refresh_debounce(mut self, window: Duration) -> Self {
        self.refresh_debounce = window;
        self
    }

    /// Sets the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

/// What happened to a `record` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The code was appended to the log.
    Accepted,
    /// The code equals the last accepted one; nothing changed.
    DuplicateSuppressed,
    /// The code was empty after trimming; nothing changed.
    Rejected,
}

impl RecordOutcome {
    /// Returns `true` if the log was mutated.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Bounded, consecutive-duplicate-suppressing, persisted scan log.
///
/// Records are kept newest-first, capped at
/// [`max_items`](HistoryConfig::max_items) with tail eviction. Duplicate
/// suppression compares against the single last-*accepted* code only — a
/// code may reappear in the log as long as a different one was scanned in
/// between. Every accepted record persists the full snapshot and re-arms a
/// trailing-edge debounced presentation refresh.
///
/// All mutation happens through [`record`](Self::record) on the host's
/// event loop; the internal locks exist for the `Send + Sync` seams, not
/// for cross-thread contention.
#[derive(Debug)]
pub struct HistoryStore {
    /// Configuration.
    config: HistoryConfig,
    /// Snapshot persistence collaborator.
    storage: Arc<dyn SnapshotStorage>,
    /// Presentation collaborator for the debounced refresh.
    presentation: Arc<dyn PresentationSurface>,
    /// The log, newest-first.
    log: Arc<RwLock<Vec<ScanRecord>>>,
    /// The last accepted code; the single dedup slot.
    last_accepted: RwLock<Option<String>>,
    /// Debounce slot for the presentation refresh.
    refresh_timer: SingleSlotTimer,
}

impl HistoryStore {
    /// Opens the store, loading any persisted snapshot.
    ///
    /// Missing storage yields an empty log; a corrupt snapshot is reported
    /// and likewise yields an empty log. Neither is an error to the caller.
    ///
    /// The dedup slot starts empty: after a reload, re-scanning the code at
    /// the head of the restored log is accepted, matching a fresh session.
    pub async fn open(
        storage: Arc<dyn SnapshotStorage>,
        presentation: Arc<dyn PresentationSurface>,
        config: HistoryConfig,
    ) -> Self {
        let log = Self::load_snapshot(storage.as_ref(), &config.storage_key).await;

        Self {
            config,
            storage,
            presentation,
            log: Arc::new(RwLock::new(log)),
            last_accepted: RwLock::new(None),
            refresh_timer: SingleSlotTimer::new(),
        }
    }

    /// Opens a store backed by the given storage with default config and no
    /// presentation surface.
    pub async fn open_headless(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self::open(
            storage,
            Arc::new(crate::surface::NullPresentation::new()),
            HistoryConfig::default(),
        )
        .await
    }

    async fn load_snapshot(storage: &dyn SnapshotStorage, key: &str) -> Vec<ScanRecord> {
        let raw = match storage.read(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                crate::events::emit_snapshot_rejected(key, &e.to_string());
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ScanRecord>>(&raw) {
            Ok(records) => {
                tracing::debug!(key = %key, count = records.len(), "History loaded");
                records
            }
            Err(e) => {
                crate::events::emit_snapshot_rejected(
                    key,
                    &StorageError::corrupt(key, e.to_string()).to_string(),
                );
                Vec::new()
            }
        }
    }

    /// Records a decoded value.
    ///
    /// Empty or whitespace-only input is rejected and logged; input equal
    /// to the last accepted code is suppressed. Otherwise the record is
    /// prepended, the tail evicted past the bound, the snapshot persisted
    /// (failures absorbed), and the debounced refresh re-armed — strictly
    /// in that order, so a refresh firing mid-burst always observes a
    /// consistent log.
    pub async fn record(&self, code: &str) -> RecordOutcome {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            tracing::warn!("Rejected history input: empty or whitespace-only code");
            return RecordOutcome::Rejected;
        }

        {
            let mut last = self
                .last_accepted
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if last.as_deref() == Some(trimmed) {
                tracing::debug!(code = %trimmed, "Duplicate code suppressed");
                return RecordOutcome::DuplicateSuppressed;
            }
            *last = Some(trimmed.to_string());
        }

        // Append, then serialize inside the same lock scope so the
        // persisted snapshot is exactly the post-append state.
        let serialized = {
            let mut log = self
                .log
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            log.insert(0, ScanRecord::captured_now(trimmed));
            log.truncate(self.config.max_items);
            serde_json::to_string(&*log)
        };

        match serialized {
            Ok(snapshot) => {
                if let Err(e) = self.storage.write(&self.config.storage_key, &snapshot).await {
                    crate::events::emit_persist_failed(&self.config.storage_key, &e.to_string());
                }
            }
            Err(e) => {
                crate::events::emit_persist_failed(&self.config.storage_key, &e.to_string());
            }
        }

        self.schedule_refresh();

        crate::events::emit_scan_recorded(trimmed, self.len());
        RecordOutcome::Accepted
    }

    /// Re-arms the trailing-edge refresh: it fires only after the quiet
    /// window passes with no further records, and reads the log at fire
    /// time.
    fn schedule_refresh(&self) {
        let log = Arc::clone(&self.log);
        let presentation = Arc::clone(&self.presentation);

        self.refresh_timer
            .schedule(self.config.refresh_debounce, async move {
                let snapshot: Vec<ScanRecord> = log
                    .read()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .clone();
                presentation.render_history(&snapshot);
            });
    }

    /// Returns a newest-first snapshot of the log.
    pub fn all(&self) -> Vec<ScanRecord> {
        self.log
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the number of records in the log.
    pub fn len(&self) -> usize {
        self.log
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns `true` if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FailureReport;
    use crate::history::traits::MemoryStorage;
    use std::sync::Mutex;

    /// Presentation stub that counts refreshes and keeps the last render.
    #[derive(Debug, Default)]
    struct RecordingPresentation {
        renders: Mutex<Vec<Vec<ScanRecord>>>,
    }

    impl RecordingPresentation {
        fn render_count(&self) -> usize {
            self.renders.lock().unwrap().len()
        }

        fn last_render(&self) -> Option<Vec<ScanRecord>> {
            self.renders.lock().unwrap().last().cloned()
        }
    }

    impl PresentationSurface for RecordingPresentation {
        fn show_code(&self, _code: &str) {}

        fn render_history(&self, records: &[ScanRecord]) {
            self.renders.lock().unwrap().push(records.to_vec());
        }

        fn set_loading(&self, _visible: bool) {}

        fn show_failure(&self, _report: &FailureReport) {}
    }

    async fn store_with(
        storage: Arc<dyn SnapshotStorage>,
        presentation: Arc<RecordingPresentation>,
    ) -> HistoryStore {
        HistoryStore::open(storage, presentation, HistoryConfig::default()).await
    }

    #[tokio::test]
    async fn test_accepts_and_orders_newest_first() {
        let store = HistoryStore::open_headless(Arc::new(MemoryStorage::new())).await;

        assert!(store.record("first").await.is_accepted());
        assert!(store.record("second").await.is_accepted());

        let all = store.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, "second");
        assert_eq!(all[1].code, "first");
    }

    #[tokio::test]
    async fn test_rejects_empty_and_whitespace() {
        let store = HistoryStore::open_headless(Arc::new(MemoryStorage::new())).await;

        assert_eq!(store.record("").await, RecordOutcome::Rejected);
        assert_eq!(store.record("   ").await, RecordOutcome::Rejected);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_trims_before_accepting() {
        let store = HistoryStore::open_headless(Arc::new(MemoryStorage::new())).await;

        store.record("  A1B2C3  ").await;
        assert_eq!(store.all()[0].code, "A1B2C3");

        // The trimmed form is what the dedup slot holds.
        assert_eq!(
            store.record("A1B2C3").await,
            RecordOutcome::DuplicateSuppressed
        );
    }

    #[tokio::test]
    async fn test_immediate_duplicate_is_noop() {
        let store = HistoryStore::open_headless(Arc::new(MemoryStorage::new())).await;

        store.record("A1B2C3").await;
        let before = store.all();

        assert_eq!(
            store.record("A1B2C3").await,
            RecordOutcome::DuplicateSuppressed
        );
        // Unchanged: same length, same timestamp.
        assert_eq!(store.all(), before);
    }

    #[tokio::test]
    async fn test_reaccepts_code_after_intervening_scan() {
        // Suppression is adjacent-only by design: it compares the single
        // last-accepted code, not log membership. A membership-based
        // rewrite would fail here.
        let store = HistoryStore::open_headless(Arc::new(MemoryStorage::new())).await;

        assert!(store.record("A").await.is_accepted());
        assert!(store.record("B").await.is_accepted());
        assert!(store.record("A").await.is_accepted());

        let records = store.all();
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B", "A"]);
    }

    #[tokio::test]
    async fn test_log_is_bounded_with_tail_eviction() {
        let store = HistoryStore::open_headless(Arc::new(MemoryStorage::new())).await;

        for i in 1..=11 {
            assert!(store.record(&format!("code-{}", i)).await.is_accepted());
        }

        let all = store.all();
        assert_eq!(all.len(), 10);
        // The 10 most recent, newest-first: 11 down to 2.
        assert_eq!(all[0].code, "code-11");
        assert_eq!(all[9].code, "code-2");
    }

    #[tokio::test]
    async fn test_length_never_exceeds_bound() {
        let store = HistoryStore::open_headless(Arc::new(MemoryStorage::new())).await;

        for i in 0..50 {
            store.record(&format!("code-{}", i)).await;
            assert!(store.len() <= 10);
        }
    }

    #[tokio::test]
    async fn test_persistence_roundtrip() {
        let storage: Arc<dyn SnapshotStorage> = Arc::new(MemoryStorage::new());

        let store = HistoryStore::open_headless(Arc::clone(&storage)).await;
        store.record("A").await;
        store.record("B").await;
        let written = store.all();

        // A second store over the same storage sees the same snapshot.
        let reloaded = HistoryStore::open_headless(storage).await;
        assert_eq!(reloaded.all(), written);
    }

    #[tokio::test]
    async fn test_reload_resets_dedup_slot() {
        let storage: Arc<dyn SnapshotStorage> = Arc::new(MemoryStorage::new());

        let store = HistoryStore::open_headless(Arc::clone(&storage)).await;
        store.record("A").await;

        // Fresh session: the head of the restored log is re-acceptable.
        let reloaded = HistoryStore::open_headless(storage).await;
        assert!(reloaded.record("A").await.is_accepted());
        assert_eq!(reloaded.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_loads_empty() {
        let storage = Arc::new(MemoryStorage::with_entry("barcode_history", "not json"));

        let store = HistoryStore::open_headless(storage).await;
        assert!(store.is_empty());

        // And the store still works.
        assert!(store.record("A").await.is_accepted());
    }

    #[tokio::test]
    async fn test_missing_snapshot_loads_empty() {
        let store = HistoryStore::open_headless(Arc::new(MemoryStorage::new())).await;
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_records_collapses_to_one_refresh() {
        let presentation = Arc::new(RecordingPresentation::default());
        let store = store_with(Arc::new(MemoryStorage::new()), Arc::clone(&presentation)).await;

        // 5 records 10ms apart, all within one another's quiet window.
        for i in 0..5 {
            store.record(&format!("code-{}", i)).await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(presentation.render_count(), 1);
        // The one refresh reflects the state after the 5th record.
        let render = presentation.last_render().unwrap();
        assert_eq!(render.len(), 5);
        assert_eq!(render[0].code, "code-4");
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_records_each_refresh() {
        let presentation = Arc::new(RecordingPresentation::default());
        let store = store_with(Arc::new(MemoryStorage::new()), Arc::clone(&presentation)).await;

        store.record("A").await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        store.record("B").await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(presentation.render_count(), 2);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = HistoryConfig::new()
            .with_max_items(3)
            .with_refresh_debounce(Duration::from_millis(5))
            .with_storage_key("short_history");

        let store = HistoryStore::open(
            Arc::new(MemoryStorage::new()),
            Arc::new(crate::surface::NullPresentation::new()),
            config,
        )
        .await;

        for i in 0..5 {
            store.record(&format!("code-{}", i)).await;
        }
        assert_eq!(store.len(), 3);
    }
}
