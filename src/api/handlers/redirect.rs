//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - **302 Found** with the target in `Location`
/// - **404 Not Found** for unknown or syntactically invalid codes
/// - **410 Gone** for expired codes
///
/// Click accounting happens asynchronously and never delays or fails the
/// redirect.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target = state.redirect_service.resolve(&code).await?;

    // axum's Redirect helpers emit 303/307/308; this endpoint's contract is
    // a plain 302.
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]))
}
