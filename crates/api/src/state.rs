//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use collector_core::{ApiKey, Client, Error, Result};
use moka::future::Cache;
use storage::Store;
use tracing::debug;

/// Cache TTL for resolved clients (30 seconds).
const AUTH_CACHE_TTL: Duration = Duration::from_secs(30);

/// Maximum cache entries.
const AUTH_CACHE_MAX_CAPACITY: u64 = 10_000;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn Store>,
    /// Resolved-client cache, keyed by key digest.
    auth_cache: Cache<String, Client>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            auth_cache: Cache::builder()
                .max_capacity(AUTH_CACHE_MAX_CAPACITY)
                .time_to_live(AUTH_CACHE_TTL)
                .build(),
        }
    }

    /// Resolves a candidate key to an active client.
    ///
    /// Successful resolutions are cached briefly to keep the hot path off
    /// the database; the underlying query is a point lookup on the unique
    /// key digest either way.
    pub async fn authenticate(&self, key: &ApiKey) -> Result<Client> {
        let digest = key.digest();

        if let Some(client) = self.auth_cache.get(&digest).await {
            debug!("Auth cache hit");
            return Ok(client);
        }

        match self.store.find_active_client(&digest).await {
            Ok(Some(client)) => {
                self.auth_cache.insert(digest, client.clone()).await;
                Ok(client)
            }
            Ok(None) => Err(Error::invalid_key()),
            Err(err) => Err(Error::store_failure(err.to_string())),
        }
    }
}
