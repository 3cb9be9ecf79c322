//! Tests for the analytics endpoints.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::json;

async fn post_event(ctx: &TestContext, key: &str, payload: &serde_json::Value) {
    ctx.server
        .post("/api/events")
        .add_header("X-API-Key", key)
        .json(payload)
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_summary_for_empty_tenant() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    let response = ctx
        .server
        .get("/api/analytics/summary")
        .add_header("X-API-Key", &key)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["client"], "Acme");
    assert_eq!(body["total_events"], 0);
    assert_eq!(body["by_type"], json!({}));
    assert_eq!(body["unique_visitors"], 0);
    assert!(body["first_event"].is_null());
}

#[tokio::test]
async fn test_summary_after_single_click() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;
    post_event(&ctx, &key, &fixtures::click_event()).await;

    let response = ctx
        .server
        .get("/api/analytics/summary")
        .add_header("X-API-Key", &key)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_events"], 1);
    assert_eq!(body["by_type"], json!({"click": 1}));
    assert_eq!(body["unique_visitors"], 1);
}

#[tokio::test]
async fn test_summary_total_equals_sum_of_by_type() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    post_event(&ctx, &key, &fixtures::click_event()).await;
    post_event(&ctx, &key, &fixtures::page_view_event("v1", "2024-01-01T13:00:00Z")).await;
    post_event(&ctx, &key, &fixtures::page_view_event("v2", "2024-01-01T14:00:00Z")).await;
    post_event(&ctx, &key, &fixtures::error_event("boom", "2024-01-01T15:00:00Z")).await;

    let response = ctx
        .server
        .get("/api/analytics/summary")
        .add_header("X-API-Key", &key)
        .await;

    let body: serde_json::Value = response.json();
    let total = body["total_events"].as_i64().unwrap();
    let by_type_sum: i64 = body["by_type"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_i64().unwrap())
        .sum();
    assert_eq!(total, 4);
    assert_eq!(total, by_type_sum);
    assert_eq!(body["unique_visitors"], 2);
    // Earliest sent_at, not insertion order.
    assert_eq!(body["first_event"], "2024-01-01T12:00:00Z");
}

#[tokio::test]
async fn test_recent_returns_newest_first_with_details() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    post_event(&ctx, &key, &fixtures::click_event()).await;
    post_event(&ctx, &key, &fixtures::page_view_event("v2", "2024-01-01T13:00:00Z")).await;
    post_event(&ctx, &key, &fixtures::error_event("boom", "2024-01-01T14:00:00Z")).await;

    let response = ctx
        .server
        .get("/api/analytics/recent")
        .add_header("X-API-Key", &key)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 3);

    // Newest first by sent_at.
    assert_eq!(events[0]["type"], "error");
    assert_eq!(events[0]["details"]["error"], "boom");
    assert!(events[0]["details"]["click"].is_null());

    assert_eq!(events[1]["type"], "page_view");
    assert_eq!(events[1]["details"]["load_time"], 412);

    assert_eq!(events[2]["type"], "click");
    assert_eq!(events[2]["details"]["click"], "button#buy");
    assert!(events[2]["details"]["load_time"].is_null());
    assert_eq!(events[2]["visitor"], "v1");
    assert_eq!(events[2]["page"], "https://x.test");
}

#[tokio::test]
async fn test_recent_caps_at_fifty() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    for minute in 0..55 {
        let sent_at = format!("2024-01-01T12:{minute:02}:00Z");
        post_event(&ctx, &key, &fixtures::page_view_event("v1", &sent_at)).await;
    }

    let response = ctx
        .server
        .get("/api/analytics/recent")
        .add_header("X-API-Key", &key)
        .await;

    let body: serde_json::Value = response.json();
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 50);
    // The five oldest fell off the window.
    assert_eq!(events[0]["time"], "2024-01-01T12:54:00Z");
    assert_eq!(events[49]["time"], "2024-01-01T12:05:00Z");
}

#[tokio::test]
async fn test_recent_is_tenant_isolated() {
    let ctx = TestContext::new();
    let acme_key = ctx.register("Acme").await;
    let other_key = ctx.register("Other").await;

    post_event(&ctx, &acme_key, &fixtures::click_event()).await;
    post_event(&ctx, &other_key, &fixtures::error_event("boom", "2024-01-01T14:00:00Z")).await;

    let response = ctx
        .server
        .get("/api/analytics/recent")
        .add_header("X-API-Key", &acme_key)
        .await;

    let body: serde_json::Value = response.json();
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "click");

    // The other tenant's summary only sees its own event too.
    let response = ctx
        .server
        .get("/api/analytics/summary")
        .add_header("X-API-Key", &other_key)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_events"], 1);
    assert_eq!(body["by_type"], json!({"error": 1}));
}

#[tokio::test]
async fn test_errors_for_tenant_with_no_errors() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;
    post_event(&ctx, &key, &fixtures::click_event()).await;

    let response = ctx
        .server
        .get("/api/analytics/errors")
        .add_header("X-API-Key", &key)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_errors"], 0);
    assert_eq!(body["recent_errors"], json!([]));
    assert_eq!(body["error_frequency"], json!({}));
}

#[tokio::test]
async fn test_error_report_frequency_and_listing() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    // 14 errors: 8 boom, 5 crash, 1 with no error_info at all.
    for minute in 0..8 {
        let sent_at = format!("2024-01-01T12:{minute:02}:00Z");
        post_event(&ctx, &key, &fixtures::error_event("boom", &sent_at)).await;
    }
    for minute in 8..13 {
        let sent_at = format!("2024-01-01T12:{minute:02}:00Z");
        post_event(&ctx, &key, &fixtures::error_event("crash", &sent_at)).await;
    }
    post_event(&ctx, &key, &fixtures::error_event_without_info("2024-01-01T12:13:00Z")).await;

    let response = ctx
        .server
        .get("/api/analytics/errors")
        .add_header("X-API-Key", &key)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_errors"], 14);

    // Frequency covers all scanned errors, missing messages as "Unknown".
    assert_eq!(body["error_frequency"]["boom"], 8);
    assert_eq!(body["error_frequency"]["crash"], 5);
    assert_eq!(body["error_frequency"]["Unknown"], 1);

    // Listing is capped at 10, newest first, with full detail.
    let listed = body["recent_errors"].as_array().unwrap();
    assert_eq!(listed.len(), 10);
    assert!(listed[0]["message"].is_null());
    assert_eq!(listed[0]["time"], "2024-01-01T12:13:00Z");
    assert_eq!(listed[1]["message"], "crash");
    assert_eq!(listed[1]["file"], "app.js");
    assert_eq!(listed[1]["line"], 42);
    assert_eq!(listed[1]["page"], "https://x.test/checkout");
}

#[tokio::test]
async fn test_error_report_ignores_other_event_types() {
    let ctx = TestContext::new();
    let key = ctx.register("Acme").await;

    post_event(&ctx, &key, &fixtures::click_event()).await;
    post_event(&ctx, &key, &fixtures::error_event("boom", "2024-01-01T14:00:00Z")).await;

    let response = ctx
        .server
        .get("/api/analytics/errors")
        .add_header("X-API-Key", &key)
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["total_errors"], 1);
    assert_eq!(body["error_frequency"], json!({"boom": 1}));
}
