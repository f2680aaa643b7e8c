mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use minilink::api::handlers::analytics_handler;
use minilink::domain::registry::Registry;
use serde_json::Value;

#[tokio::test]
async fn test_analytics_lists_active_links_newest_first() {
    let (state, registry, _rx) = common::create_test_state();
    let app = Router::new()
        .route("/api/analytics", get(analytics_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    common::create_test_url(registry.as_ref(), "first1", "https://example.com/1").await;
    common::create_test_url(registry.as_ref(), "second", "https://example.com/2").await;
    common::create_expired_url(registry.as_ref(), "dead01", "https://example.com/dead").await;

    let response = server.get("/api/analytics").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let urls = body["urls"].as_array().unwrap();

    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0]["code"], "second");
    assert_eq!(urls[1]["code"], "first1");
    assert_eq!(urls[1]["originalUrl"], "https://example.com/1");
}

#[tokio::test]
async fn test_analytics_reports_click_counts() {
    let (state, registry, _rx) = common::create_test_state();
    let app = Router::new()
        .route("/api/analytics", get(analytics_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    common::create_test_url(registry.as_ref(), "hot123", "https://example.com/hot").await;
    for _ in 0..3 {
        registry.increment_click("hot123").await.unwrap();
    }

    let response = server.get("/api/analytics").await;
    let body: Value = response.json();

    assert_eq!(body["urls"][0]["code"], "hot123");
    assert_eq!(body["urls"][0]["clickCount"], 3);
    assert!(body["urls"][0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_analytics_empty_registry() {
    let (state, _registry, _rx) = common::create_test_state();
    let app = Router::new()
        .route("/api/analytics", get(analytics_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/api/analytics").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["urls"].as_array().unwrap().len(), 0);
}
