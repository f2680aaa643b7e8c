#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use minilink::domain::click_event::ClickEvent;
use minilink::domain::entities::NewUrlRecord;
use minilink::domain::registry::Registry;
use minilink::infrastructure::persistence::MemoryRegistry;
use minilink::state::AppState;
use tokio::sync::mpsc;

pub const TEST_BASE_URL: &str = "https://mini.link";

/// Builds an [`AppState`] over a fresh in-memory registry.
///
/// Returns the registry handle for direct seeding/inspection and the click
/// event receiver so tests can observe accounting traffic.
pub fn create_test_state() -> (AppState, Arc<MemoryRegistry>, mpsc::Receiver<ClickEvent>) {
    let registry = Arc::new(MemoryRegistry::new());
    let (tx, rx) = mpsc::channel(100);

    let shared: Arc<dyn Registry> = registry.clone();
    let state = AppState::new(shared, tx, TEST_BASE_URL.to_string(), 30);

    (state, registry, rx)
}

pub async fn create_test_url(registry: &dyn Registry, code: &str, url: &str) {
    registry
        .create(NewUrlRecord {
            code: code.to_string(),
            original_url: url.to_string(),
            expires_at: None,
        })
        .await
        .unwrap();
}

pub async fn create_expired_url(registry: &dyn Registry, code: &str, url: &str) {
    registry
        .create(NewUrlRecord {
            code: code.to_string(),
            original_url: url.to_string(),
            expires_at: Some(Utc::now() - Duration::hours(1)),
        })
        .await
        .unwrap();
}
