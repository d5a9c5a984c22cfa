use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use crate::repository::{AssessmentRepository, StorageError};
use crate::snapshot::{AssessmentSnapshot, STORAGE_KEY};

use super::SqliteRepository;

impl SqliteRepository {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.map(|row| {
            row.try_get::<String, _>("value")
                .map_err(|err| StorageError::Serialization(err.to_string()))
        })
        .transpose()
    }

    /// Insert or replace the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AssessmentRepository for SqliteRepository {
    async fn load_snapshot(&self) -> Result<Option<AssessmentSnapshot>, StorageError> {
        self.get_value(STORAGE_KEY)
            .await?
            .map(|text| AssessmentSnapshot::decode(&text))
            .transpose()
    }

    async fn save_snapshot(&self, snapshot: &AssessmentSnapshot) -> Result<(), StorageError> {
        let text = snapshot.encode()?;
        self.put_value(STORAGE_KEY, &text).await?;
        debug!(
            responses = snapshot.responses.len(),
            categories = snapshot.category_scores.len(),
            "saved assessment snapshot"
        );
        Ok(())
    }
}
