//! Handler for the analytics endpoint.

use axum::{Json, extract::State};

use crate::api::dto::analytics::{AnalyticsEntry, AnalyticsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Read-only dump of all active short links with their click counts.
///
/// # Endpoint
///
/// `GET /api/analytics`
///
/// Records are returned newest first; expired links are excluded.
pub async fn analytics_handler(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let records = state.analytics_service.overview().await?;

    Ok(Json(AnalyticsResponse {
        urls: records.into_iter().map(AnalyticsEntry::from).collect(),
    }))
}
