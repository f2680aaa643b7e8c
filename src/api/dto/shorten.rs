//! DTOs for the shorten endpoint.
//!
//! Wire field names are camelCase, matching the public API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL to shorten (must be a public HTTP/HTTPS URL).
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    /// Optional expiry override. Must be in the future; when absent the
    /// configured retention window applies.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A created (or reused) short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl ShortenResponse {
    pub fn from_record(record: UrlRecord, short_url: String) -> Self {
        Self {
            short_url,
            short_code: record.code,
            original_url: record.original_url,
            created_at: record.created_at,
            click_count: record.click_count,
        }
    }
}
