//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use collector_core::Client;

use crate::response::ApiError;

/// The authenticated tenant, resolved by the auth gate.
///
/// Handlers receive it as an explicit parameter rather than reaching into
/// ambient request state; the extractor just reads the `Client` the
/// middleware stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthedClient(pub Client);

#[async_trait]
impl<S> FromRequestParts<S> for AuthedClient
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only reachable on routes behind the auth gate; absence means a
        // route was wired without it.
        parts
            .extensions
            .get::<Client>()
            .cloned()
            .map(AuthedClient)
            .ok_or_else(|| ApiError::internal("Internal error"))
    }
}
