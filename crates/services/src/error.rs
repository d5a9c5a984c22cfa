//! Shared error types for the services crate.

use thiserror::Error;

use maturity_core::model::{AssessmentError, IdError, LevelError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `AssessmentStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to persist assessment: {0}")]
    Persist(String),
    #[error("assessment persistence is not running")]
    PersisterStopped,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Id(#[from] IdError),
}
