//! Analytics endpoints.
//!
//! Every query is scoped to the authenticated client's id; there is no
//! code path that reads another tenant's rows.

use std::time::Instant;

use axum::{extract::State, Json};
use collector_core::analytics::{self, ErrorReport, EventView};
use telemetry::metrics;
use tracing::error;

use crate::extractors::AuthedClient;
use crate::response::{ApiError, SummaryResponse};
use crate::state::AppState;

/// GET /api/analytics/summary - aggregate counts at a single read point.
pub async fn summary(
    State(state): State<AppState>,
    AuthedClient(client): AuthedClient,
) -> Result<Json<SummaryResponse>, ApiError> {
    let start = Instant::now();

    let summary = state.store.summary(client.id).await.map_err(|err| {
        error!(client_id = client.id, error = %err, "Summary query failed");
        ApiError::internal("Failed to load analytics")
    })?;

    metrics().request_duration.observe(
        &["/api/analytics/summary"],
        start.elapsed().as_millis() as u64,
    );

    Ok(Json(SummaryResponse::new(client.name, summary)))
}

/// GET /api/analytics/recent - the 50 most recent events.
pub async fn recent(
    State(state): State<AppState>,
    AuthedClient(client): AuthedClient,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let start = Instant::now();

    let events = state
        .store
        .recent_events(client.id, analytics::RECENT_LIMIT)
        .await
        .map_err(|err| {
            error!(client_id = client.id, error = %err, "Recent query failed");
            ApiError::internal("Failed to load analytics")
        })?;

    let views: Vec<EventView> = events.iter().map(EventView::from_stored).collect();

    metrics().request_duration.observe(
        &["/api/analytics/recent"],
        start.elapsed().as_millis() as u64,
    );

    Ok(Json(views))
}

/// GET /api/analytics/errors - error frequency over the last 100 errors,
/// detail for the first 10.
pub async fn errors(
    State(state): State<AppState>,
    AuthedClient(client): AuthedClient,
) -> Result<Json<ErrorReport>, ApiError> {
    let start = Instant::now();

    let events = state
        .store
        .recent_errors(client.id, analytics::ERROR_SCAN_LIMIT)
        .await
        .map_err(|err| {
            error!(client_id = client.id, error = %err, "Error query failed");
            ApiError::internal("Failed to load analytics")
        })?;

    let report = analytics::error_report(&events);

    metrics().request_duration.observe(
        &["/api/analytics/errors"],
        start.elapsed().as_millis() as u64,
    );

    Ok(Json(report))
}
