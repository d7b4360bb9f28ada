//! Snapshot storage trait definition.

use crate::core::error::StorageError;

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

/// Key-value string storage for persisted snapshots.
///
/// Models the browser's `localStorage` collaborator: a flat string-to-string
/// map where reads may legitimately return nothing. The history store uses a
/// single fixed key; implementations should not assume anything about the
/// value beyond it being an opaque string.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use scanloop::history::SnapshotStorage;
/// use scanloop::core::StorageError;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyStorage;
///
/// #[async_trait]
/// impl SnapshotStorage for MyStorage {
///     async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
///         // Look up the key...
///         Ok(None)
///     }
///
///     async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
///         // Persist the value...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SnapshotStorage: Send + Sync + Debug {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet — an expected
    /// state on first launch, not an error.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory snapshot storage.
///
/// The default backing store: scan history survives restarts only when the
/// host wires in a persistent implementation such as
/// [`FileStorage`](crate::history::FileStorage).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry, for tests.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), value.into());
        store
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
