use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::snapshot::{AssessmentSnapshot, STORAGE_KEY};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unsupported snapshot version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Repository contract for the persisted assessment snapshot.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Load the stored snapshot, migrated to the current schema version.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be read or decoded.
    async fn load_snapshot(&self) -> Result<Option<AssessmentSnapshot>, StorageError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be encoded or stored.
    async fn save_snapshot(&self, snapshot: &AssessmentSnapshot) -> Result<(), StorageError>;
}

/// Simple in-memory key-value repository for testing and prototyping.
///
/// Values are kept as encoded text so the same decode path runs as with a
/// durable backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Raw stored text for a key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    /// Store raw text under a key, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.into());
        Ok(())
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryRepository {
    async fn load_snapshot(&self) -> Result<Option<AssessmentSnapshot>, StorageError> {
        self.raw(STORAGE_KEY)?
            .map(|text| AssessmentSnapshot::decode(&text))
            .transpose()
    }

    async fn save_snapshot(&self, snapshot: &AssessmentSnapshot) -> Result<(), StorageError> {
        let text = snapshot.encode()?;
        self.put_raw(STORAGE_KEY, text)
    }
}

/// Bundles repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub assessments: Arc<dyn AssessmentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let assessments: Arc<dyn AssessmentRepository> = Arc::new(repo);
        Self { assessments }
    }
}
