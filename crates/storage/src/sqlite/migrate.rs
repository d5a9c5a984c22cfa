use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::SqliteInitError;

async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
        .bind(version)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Applies pending schema migrations in order.
///
/// Version 1 creates the key-value table that holds the assessment snapshot.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: key-value store.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS kv_store (
                    key TEXT PRIMARY KEY NOT NULL CHECK (length(key) > 0),
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(version = 1, "applied sqlite migration");
    }

    Ok(())
}
