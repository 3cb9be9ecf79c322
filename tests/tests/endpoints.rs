//! Tests for the public endpoints.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn test_home_returns_banner() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "Collector is running");
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_metrics_exposition_format() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/metrics").await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));

    let text = response.text();
    assert!(text.contains("# TYPE events_total counter"));
    assert!(text.contains("# TYPE request_duration_seconds histogram"));
    assert!(text.contains("# TYPE errors_total counter"));
}

#[tokio::test]
async fn test_metrics_reflect_traffic() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    ctx.server
        .post("/api/events")
        .add_header("X-API-Key", &key)
        .json(&fixtures::click_event())
        .await
        .assert_status(StatusCode::CREATED);

    let text = ctx.server.get("/metrics").await.text();
    // The global registry is shared across concurrently-running tests, so
    // only assert that this test's series exists.
    assert!(text.contains(r#"events_total{event_type="click",client="Acme"}"#));
    assert!(text.contains(r#"request_duration_seconds_count{endpoint="/api/events"}"#));
}

#[tokio::test]
async fn test_unknown_path_is_gated_before_404() {
    let ctx = TestContext::new();

    // Without a key, probing an unknown path hits the auth gate first.
    let response = ctx.server.get("/api/unknown").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // With a valid key the router answers 404 as usual.
    let key = ctx.register("Acme").await;
    let response = ctx
        .server
        .get("/api/unknown")
        .add_header("X-API-Key", &key)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
