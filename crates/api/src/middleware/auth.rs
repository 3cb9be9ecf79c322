//! The auth gate.
//!
//! Runs before every request except the explicit allow-list of public
//! paths; unknown paths are gated too, so probing the API surface without
//! a key only ever sees 401.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use collector_core::{ApiKey, Error};
use telemetry::metrics;
use tracing::{error, warn};

use crate::response::ApiError;
use crate::state::AppState;

/// Upper bound on buffered request bodies.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Paths that skip the gate.
const PUBLIC_PATHS: [&str; 4] = ["/", "/health", "/metrics", "/api/register"];

/// Resolves the request's API key to an active client.
///
/// The candidate key comes from a JSON body field `api_key` when present,
/// else the `X-API-Key` header; the body wins. The body is buffered so the
/// handler still sees it unchanged, and the resolved `Client` rides in
/// request extensions for the `AuthedClient` extractor.
pub async fn require_client(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            metrics().errors_total.inc(&["validation"]);
            return ApiError::validation("Request body too large").into_response();
        }
    };

    let candidate = key_from_body(&bytes).or_else(|| key_from_headers(&parts.headers));

    let Some(raw) = candidate else {
        warn!(path = %parts.uri.path(), "Request missing api_key");
        metrics().errors_total.inc(&["auth_missing"]);
        return ApiError::from(Error::missing_key()).into_response();
    };

    let key = match ApiKey::parse(&raw) {
        Ok(key) => key,
        Err(err) => {
            metrics().errors_total.inc(&[err.metric_label()]);
            return ApiError::from(err).into_response();
        }
    };

    let client = match state.authenticate(&key).await {
        Ok(client) => client,
        Err(err) => {
            if matches!(err, Error::Processing(_)) {
                error!(error = %err, "Auth lookup failed");
            }
            metrics().errors_total.inc(&[err.metric_label()]);
            return ApiError::from(err).into_response();
        }
    };

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(client);
    next.run(request).await
}

/// `api_key` from a JSON object body. Empty strings count as absent so the
/// header fallback still applies.
fn key_from_body(bytes: &Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    value
        .get("api_key")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// `X-API-Key` header fallback.
fn key_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-API-Key")?
        .to_str()
        .ok()
        .filter(|s| !s.is_empty())
        .map(String::from)
}
