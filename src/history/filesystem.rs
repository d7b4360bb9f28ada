//! Filesystem-based snapshot storage implementation.

use crate::core::error::StorageError;
use crate::history::traits::SnapshotStorage;

use async_trait::async_trait;
use std::path::PathBuf;

/// Filesystem-backed snapshot storage.
///
/// Stores each key as one file under a base directory, so a host shell can
/// keep scan history across launches. Keys map directly to file names with
/// a `.json` extension; the history store only ever uses a single fixed
/// key, so the directory stays flat and small.
///
/// # Directory Structure
///
/// ```text
/// storage/
/// └── barcode_history.json
/// ```
#[derive(Debug)]
pub struct FileStorage {
    /// Base directory for snapshot files.
    base_path: PathBuf,
}

impl FileStorage {
    /// Creates a file store at the given path.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::write_failed(
                base_path.display().to_string(),
                format!("failed to create storage directory: {}", e),
            )
        })?;

        Ok(Self { base_path })
    }

    /// Returns the file path backing a given key.
    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed identifiers, not user input, but sanitize anyway
        // so a path separator can't escape the base directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            })
            .collect();
        self.base_path.join(format!("{}.json", safe))
    }
}

#[async_trait]
impl SnapshotStorage for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::read_failed(key, e.to_string())),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| StorageError::write_failed(key, e.to_string()))?;

        tracing::debug!(key = %key, bytes = value.len(), "Snapshot written");
        Ok(())
    }
}
