//! Handler for the shorten endpoint.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Responses
///
/// - **201 Created** with the new link
/// - **200 OK** when an active link for the same URL already exists
///   (idempotent reuse — the existing code is returned)
/// - **400 Bad Request** with a machine-readable kind
///   (`malformed_url` / `blocked_host` / `url_too_long`)
/// - **429 Too Many Requests** from the rate-limit layer
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let outcome = state
        .shorten_service
        .shorten(&payload.url, payload.expires_at)
        .await?;

    let status = if outcome.reused {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    let short_url = state.short_url(&outcome.record.code);

    Ok((
        status,
        Json(ShortenResponse::from_record(outcome.record, short_url)),
    ))
}
