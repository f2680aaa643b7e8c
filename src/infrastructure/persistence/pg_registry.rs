//! PostgreSQL registry backend.
//!
//! Linearizability comes from the database: a unique index on `code` makes
//! `create` an atomic check-and-insert, and `increment_click` is a single
//! `UPDATE` with an SQL-side increment. Queries are bound at runtime so the
//! crate builds without a live database.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::registry::{Registry, RegistryError};

const SELECT_COLUMNS: &str =
    "code, original_url, created_at, expires_at, click_count, last_accessed";

#[derive(sqlx::FromRow)]
struct UrlRow {
    code: String,
    original_url: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
    last_accessed: Option<DateTime<Utc>>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(
            row.code,
            row.original_url,
            row.created_at,
            row.expires_at,
            row.click_count,
            row.last_accessed,
        )
    }
}

pub struct PgRegistry {
    pool: Arc<PgPool>,
}

impl PgRegistry {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Maps a database error, logging the cause so the typed error can stay
/// free of backend detail.
fn storage_error(e: sqlx::Error) -> RegistryError {
    error!("database error: {e}");
    RegistryError::Unavailable(e.to_string())
}

/// Like [`storage_error`], but recognizes a unique-constraint violation on
/// the insert path as a code collision.
fn create_error(code: &str, e: sqlx::Error) -> RegistryError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return RegistryError::CodeCollision {
                code: code.to_string(),
            };
        }
    }

    storage_error(e)
}

#[async_trait]
impl Registry for PgRegistry {
    async fn create(&self, record: NewUrlRecord) -> Result<UrlRecord, RegistryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        // An expired row still occupies the unique index; clear it first so
        // only *active* holders count as collisions.
        sqlx::query("DELETE FROM urls WHERE code = $1 AND expires_at IS NOT NULL AND expires_at <= NOW()")
            .bind(&record.code)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "INSERT INTO urls (code, original_url, expires_at) VALUES ($1, $2, $3) RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&record.code)
        .bind(&record.original_url)
        .bind(record.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| create_error(&record.code, e))?;

        tx.commit().await.map_err(storage_error)?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, RegistryError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM urls WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(storage_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_active_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, RegistryError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM urls \
             WHERE original_url = $1 AND (expires_at IS NULL OR expires_at > NOW()) \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(storage_error)?;

        Ok(row.map(Into::into))
    }

    async fn increment_click(&self, code: &str) -> Result<(), RegistryError> {
        let result =
            sqlx::query("UPDATE urls SET click_count = click_count + 1, last_accessed = NOW() WHERE code = $1")
                .bind(code)
                .execute(self.pool.as_ref())
                .await
                .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound {
                code: code.to_string(),
            });
        }

        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<UrlRecord>, RegistryError> {
        let rows = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM urls \
             WHERE expires_at IS NULL OR expires_at > NOW() \
             ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn sweep_expired(&self) -> Result<u64, RegistryError> {
        let result =
            sqlx::query("DELETE FROM urls WHERE expires_at IS NOT NULL AND expires_at <= NOW()")
                .execute(self.pool.as_ref())
                .await
                .map_err(storage_error)?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, RegistryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(storage_error)
    }
}
