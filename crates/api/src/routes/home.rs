//! Root endpoint.

/// GET / - liveness text.
pub async fn home() -> &'static str {
    "Collector is running"
}
