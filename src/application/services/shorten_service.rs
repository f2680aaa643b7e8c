//! URL shortening service: validation, dedup, code allocation, creation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::registry::{Registry, RegistryError};
use crate::error::AppError;
use crate::utils::code_generator::generate_unique;
use crate::utils::url_validator::validate_url;

/// Creation retries after losing the atomic code reservation to a
/// concurrent request.
const MAX_CREATE_ATTEMPTS: u32 = 10;

/// Result of a shorten request.
#[derive(Debug)]
pub struct ShortenOutcome {
    pub record: UrlRecord,
    /// True when an existing active record was returned instead of a new one.
    pub reused: bool,
}

/// Service for creating short links.
///
/// Shortening is idempotent: while an active record maps to the same
/// normalized URL, repeated requests return that record's code. Expired
/// records do not participate and never block a fresh code.
pub struct ShortenService {
    registry: Arc<dyn Registry>,
    default_ttl: Option<Duration>,
}

impl ShortenService {
    /// Creates the service. `default_ttl_days` is the retention window
    /// applied to new records; `0` means new records never expire.
    pub fn new(registry: Arc<dyn Registry>, default_ttl_days: i64) -> Self {
        Self {
            registry,
            default_ttl: (default_ttl_days > 0).then(|| Duration::days(default_ttl_days)),
        }
    }

    /// Shortens `raw_url`, reusing an active record when one exists.
    ///
    /// `expires_at` overrides the configured retention window and must be
    /// strictly in the future.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed, blocked, or
    /// over-long URL and for an expiry in the past. Code collisions are
    /// retried transparently; only keyspace exhaustion surfaces, as a 500.
    pub async fn shorten(
        &self,
        raw_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShortenOutcome, AppError> {
        let url = validate_url(raw_url)?;

        if let Some(requested) = expires_at {
            if requested <= Utc::now() {
                return Err(AppError::bad_request(
                    "validation_error",
                    "Expiry date cannot be in the past",
                    json!({ "expiresAt": requested }),
                ));
            }
        }

        if let Some(existing) = self.registry.find_active_by_original_url(&url).await? {
            return Ok(ShortenOutcome {
                record: existing,
                reused: true,
            });
        }

        let expires_at = expires_at.or_else(|| self.default_ttl.map(|ttl| Utc::now() + ttl));

        // Another request can win the same code between the uniqueness probe
        // and the insert; `create` is atomic, so losing shows up as a
        // collision and we try again with a fresh code.
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let code = generate_unique(self.registry.as_ref()).await?;

            match self
                .registry
                .create(NewUrlRecord {
                    code,
                    original_url: url.clone(),
                    expires_at,
                })
                .await
            {
                Ok(record) => {
                    return Ok(ShortenOutcome {
                        record,
                        reused: false,
                    });
                }
                Err(RegistryError::CodeCollision { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(RegistryError::ExhaustedKeyspace {
            attempts: MAX_CREATE_ATTEMPTS,
        }
        .into())
    }
}
