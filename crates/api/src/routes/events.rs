//! Ingestion endpoint.

use std::time::Instant;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use collector_core::{payload, NewEvent};
use telemetry::metrics;
use tracing::{error, warn};

use crate::extractors::AuthedClient;
use crate::response::{ApiError, IngestResponse};
use crate::state::AppState;

/// POST /api/events - validate, normalize, and persist one event.
///
/// Validation failures answer 400 before the store is touched; anything
/// that fails after that point is a processing error: the transaction is
/// rolled back, the detail is logged, and the caller sees a generic 500.
pub async fn track_event(
    State(state): State<AppState>,
    AuthedClient(client): AuthedClient,
    body: Bytes,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let start = Instant::now();

    let payload_value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::validation("Invalid JSON payload"))?;

    if let Err(err) = payload::check_required(&payload_value) {
        metrics().errors_total.inc(&[err.metric_label()]);
        return Err(ApiError::from(err));
    }

    let event = match NewEvent::from_payload(client.id, &payload_value) {
        Ok(event) => event,
        Err(err) => {
            warn!(client_id = client.id, error = %err, "Rejected event payload");
            metrics().errors_total.inc(&[err.metric_label()]);
            return Err(ApiError::from(err));
        }
    };
    let event_type = event.event_type.clone();

    let receipt = match state.store.insert_event(event).await {
        Ok(receipt) => receipt,
        Err(err) => {
            error!(client_id = client.id, error = %err, "Failed to store event");
            metrics().errors_total.inc(&["processing"]);
            return Err(ApiError::internal("Failed to process event"));
        }
    };

    metrics()
        .events_total
        .inc(&[event_type.as_str(), client.name.as_str()]);
    metrics()
        .request_duration
        .observe(&["/api/events"], start.elapsed().as_millis() as u64);

    Ok((StatusCode::CREATED, Json(IngestResponse::new(receipt))))
}
