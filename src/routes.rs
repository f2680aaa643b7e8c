//! Router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`        - Short link redirect (public)
//! - `GET  /health`        - Health check: storage, click queue (public)
//! - `POST /api/shorten`   - Create a short link (rate limited)
//! - `GET  /api/analytics` - Active link dump with click counts (rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **Rate limiting** - per-IP token bucket on the `/api` surface,
//!   proxy-aware when configured
//! - **Path normalization** - trailing slash handling

use axum::{
    Router,
    routing::{get, post},
};
use tower::Layer;
use tower_http::LatencyUnit;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::api::handlers::{
    analytics_handler, health_handler, redirect_handler, shorten_handler,
};
use crate::api::middleware::rate_limit;
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
///
/// `behind_proxy` switches rate limiting to read the client IP from
/// `X-Forwarded-For` / `X-Real-IP`; enable only behind a trusted reverse
/// proxy.
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api = Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/analytics", get(analytics_handler));

    let api = if behind_proxy {
        api.layer(rate_limit::proxied_layer())
    } else {
        api.layer(rate_limit::layer())
    };

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        );

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
