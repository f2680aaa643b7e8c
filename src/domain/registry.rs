//! The registry: an abstract keyed store of short code → URL record.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use async_trait::async_trait;

/// Errors produced by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("short code '{code}' is already taken")]
    CodeCollision { code: String },

    #[error("no record for short code '{code}'")]
    NotFound { code: String },

    #[error("could not find a free short code after {attempts} attempts")]
    ExhaustedKeyspace { attempts: u32 },

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Keyed store owning the full lifecycle of [`UrlRecord`]s.
///
/// Mutating operations (`create`, `increment_click`, `sweep_expired`) are
/// linearizable: concurrent calls behave as if serialized, with no lost click
/// updates and no two `create` calls both winning the same active code.
/// Lookups may run concurrently and only need a recent snapshot.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryRegistry`] - in-process map
/// - [`crate::infrastructure::persistence::PgRegistry`] - PostgreSQL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Atomically reserves `record.code` and stores the record.
    ///
    /// The collision check and the insert are a single atomic step; the
    /// resampling loop in code generation alone cannot close that race. An
    /// expired record holding the same code does not block creation — it is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CodeCollision`] if an active record already
    /// holds the code.
    async fn create(&self, record: NewUrlRecord) -> Result<UrlRecord, RegistryError>;

    /// Looks up a record by code regardless of its expiry state.
    ///
    /// Callers that need to distinguish "expired" from "missing" (the
    /// redirect path) inspect the returned record themselves.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, RegistryError>;

    /// Finds an active record mapping to `original_url`, newest first.
    ///
    /// Used for idempotent shortening; expired records are not eligible and
    /// never block the creation of a fresh one.
    async fn find_active_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, RegistryError>;

    /// Atomically increments the click counter and stamps `last_accessed`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no record holds the code.
    async fn increment_click(&self, code: &str) -> Result<(), RegistryError>;

    /// All active records, newest first.
    async fn list_active(&self) -> Result<Vec<UrlRecord>, RegistryError>;

    /// Deletes every record whose expiry time has passed.
    ///
    /// Idempotent and safe to run concurrently with reads and writes.
    /// Returns the number of records removed.
    async fn sweep_expired(&self) -> Result<u64, RegistryError>;

    /// Total number of stored records, expired ones included.
    async fn count(&self) -> Result<i64, RegistryError>;
}
