//! DTOs for the analytics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlRecord;

/// Read-only dump of all active short links.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub urls: Vec<AnalyticsEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEntry {
    pub code: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UrlRecord> for AnalyticsEntry {
    fn from(record: UrlRecord) -> Self {
        Self {
            code: record.code,
            original_url: record.original_url,
            click_count: record.click_count,
            created_at: record.created_at,
        }
    }
}
