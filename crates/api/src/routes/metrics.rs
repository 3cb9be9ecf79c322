//! Metrics scrape endpoint.

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use telemetry::exposition;

/// GET /metrics - Prometheus text exposition.
pub async fn metrics() -> Response {
    (
        [(CONTENT_TYPE, exposition::CONTENT_TYPE)],
        exposition::render(),
    )
        .into_response()
}
