//! The persistence seam.

use async_trait::async_trait;
use collector_core::{Client, EventReceipt, EventSummary, NewEvent, StoredEvent};

use crate::error::Result;

/// Storage contract for clients and events.
///
/// The production implementation is [`crate::PgStore`]; tests substitute an
/// in-memory store behind the same trait. Every query that touches events
/// is scoped to one `client_id` -- there is deliberately no way to read
/// across tenants.
#[async_trait]
pub trait Store: Send + Sync {
    /// Creates a client row. Only the key digest is persisted.
    async fn create_client(&self, name: &str, key_hash: &str) -> Result<Client>;

    /// Point lookup on the unique key-hash index, restricted to active
    /// clients.
    async fn find_active_client(&self, key_hash: &str) -> Result<Option<Client>>;

    /// Persists one event inside a transaction; on failure nothing is
    /// visible to other readers.
    async fn insert_event(&self, event: NewEvent) -> Result<EventReceipt>;

    /// Aggregate counts for one tenant, computed at a single read point.
    async fn summary(&self, client_id: i32) -> Result<EventSummary>;

    /// Most recent events by `sent_at` descending, capped at `limit`.
    async fn recent_events(&self, client_id: i32, limit: i64) -> Result<Vec<StoredEvent>>;

    /// Most recent `error`-type events by `sent_at` descending, capped at
    /// `limit`.
    async fn recent_errors(&self, client_id: i32, limit: i64) -> Result<Vec<StoredEvent>>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> Result<()>;
}
