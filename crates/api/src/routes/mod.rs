//! API routes.

pub mod analytics;
pub mod events;
pub mod health;
pub mod home;
pub mod metrics;
pub mod register;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::auth;
use crate::state::AppState;

/// Creates the API router.
///
/// The auth gate wraps every route; its explicit allow-list exempts the
/// public paths (home, health, metrics, registration).
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/metrics", get(metrics::metrics))
        .route("/api/register", post(register::register))
        .route("/api/events", post(events::track_event))
        .route("/api/analytics/summary", get(analytics::summary))
        .route("/api/analytics/recent", get(analytics::recent))
        .route("/api/analytics/errors", get(analytics::errors))
        .layer(from_fn_with_state(state.clone(), auth::require_client))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
