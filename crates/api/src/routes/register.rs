//! Client registration endpoint.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use collector_core::{ApiKey, RegisterRequest};
use tracing::{error, info};
use validator::Validate;

use crate::response::{ApiError, RegisterResponse};
use crate::state::AppState;

/// POST /api/register - create a tenant and issue its API key.
///
/// The plaintext key is returned exactly once; only its digest is stored.
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let request: RegisterRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::validation("Client name required"))?;
    request
        .validate()
        .map_err(|_| ApiError::validation("Client name required"))?;

    let key = ApiKey::generate();
    let client = state
        .store
        .create_client(&request.name, &key.digest())
        .await
        .map_err(|err| {
            error!(error = %err, "Failed to create client");
            ApiError::internal("Failed to register client")
        })?;

    info!(client_id = client.id, name = %client.name, "Registered new client");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse::new(key.into_string())),
    ))
}
