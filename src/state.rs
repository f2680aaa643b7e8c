//! Shared application state injected into all handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AnalyticsService, RedirectService, ShortenService};
use crate::domain::click_event::ClickEvent;
use crate::domain::registry::Registry;

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub redirect_service: Arc<RedirectService>,
    pub analytics_service: Arc<AnalyticsService>,
    /// Direct registry handle for health checks and maintenance.
    pub registry: Arc<dyn Registry>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    base_url: String,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn Registry>,
        click_tx: mpsc::Sender<ClickEvent>,
        base_url: String,
        default_ttl_days: i64,
    ) -> Self {
        Self {
            shorten_service: Arc::new(ShortenService::new(registry.clone(), default_ttl_days)),
            redirect_service: Arc::new(RedirectService::new(registry.clone(), click_tx.clone())),
            analytics_service: Arc::new(AnalyticsService::new(registry.clone())),
            registry,
            click_sender: click_tx,
            base_url,
        }
    }

    /// Full short URL for a code, e.g. `https://mini.link/abc123`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }
}
