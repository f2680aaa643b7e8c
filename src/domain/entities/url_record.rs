//! The URL record entity: one short code mapped to one target URL.

use chrono::{DateTime, Utc};

/// A shortened URL with its accounting metadata.
///
/// The registry exclusively owns all records; everything handed out by lookup
/// methods is a snapshot.
#[derive(Debug, Clone)]
pub struct UrlRecord {
    /// Unique short identifier, 4-10 characters from `[A-Za-z0-9_-]`.
    pub code: String,
    /// The validated target URL.
    pub original_url: String,
    /// Set once at creation, immutable afterwards.
    pub created_at: DateTime<Utc>,
    /// `None` means the record never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Successful redirects served for this code. Never decreases.
    pub click_count: i64,
    /// Timestamp of the most recent successful redirect.
    pub last_accessed: Option<DateTime<Utc>>,
}

impl UrlRecord {
    pub fn new(
        code: String,
        original_url: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        click_count: i64,
        last_accessed: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            code,
            original_url,
            created_at,
            expires_at,
            click_count,
            last_accessed,
        }
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }
}

/// Input data for creating a new record.
#[derive(Debug, Clone)]
pub struct NewUrlRecord {
    pub code: String,
    pub original_url: String,
    /// `None` means the record never expires; if set, must be strictly after
    /// the creation time (enforced before the registry is reached).
    pub expires_at: Option<DateTime<Utc>>,
}
