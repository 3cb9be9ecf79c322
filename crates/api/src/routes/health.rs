//! Health check endpoint.

use axum::Json;
use chrono::Utc;

use crate::response::HealthResponse;

/// GET /health - service health.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}
