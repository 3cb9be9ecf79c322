//! Tests for the auth gate.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn test_missing_key_returns_401() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/analytics/summary").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing api_key");
}

#[tokio::test]
async fn test_ingest_without_key_returns_401() {
    let ctx = TestContext::new();

    // A full, valid payload still fails without a key.
    let response = ctx
        .server
        .post("/api/events")
        .json(&fixtures::click_event())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing api_key");
    assert_eq!(ctx.store.event_count(), 0);
}

#[tokio::test]
async fn test_unknown_key_returns_401() {
    let ctx = TestContext::new();
    ctx.register("Acme").await;

    let response = ctx
        .server
        .get("/api/analytics/summary")
        .add_header("X-API-Key", "sk_AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_malformed_key_returns_401() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/analytics/summary")
        .add_header("X-API-Key", "not-a-collector-key")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_key_in_body_authenticates() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    let mut payload = fixtures::click_event();
    payload["api_key"] = serde_json::json!(key);

    let response = ctx.server.post("/api/events").json(&payload).await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(ctx.store.event_count(), 1);
}

#[tokio::test]
async fn test_body_key_takes_precedence_over_header() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    let mut payload = fixtures::click_event();
    payload["api_key"] = serde_json::json!(key);

    // Garbage header is ignored because the body carries a key.
    let response = ctx
        .server
        .post("/api/events")
        .add_header("X-API-Key", "sk_BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB")
        .json(&payload)
        .await;

    response.assert_status(StatusCode::CREATED);

    // And a bad body key fails even when the header is valid.
    let mut payload = fixtures::click_event();
    payload["api_key"] = serde_json::json!("sk_BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");

    let response = ctx
        .server
        .post("/api/events")
        .add_header("X-API-Key", &key)
        .json(&payload)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_client_is_rejected() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;
    ctx.store.deactivate_client(1);

    let response = ctx
        .server
        .get("/api/analytics/summary")
        .add_header("X-API-Key", &key)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_public_paths_need_no_key() {
    let ctx = TestContext::new();

    ctx.server.get("/").await.assert_status_ok();
    ctx.server.get("/health").await.assert_status_ok();
    ctx.server.get("/metrics").await.assert_status_ok();

    let response = ctx
        .server
        .post("/api/register")
        .json(&serde_json::json!({"name": "Acme"}))
        .await;
    response.assert_status(StatusCode::CREATED);
}
