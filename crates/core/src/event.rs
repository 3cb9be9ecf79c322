//! Event type definitions for the collector.
//!
//! Typed columns exist only for fields the fixed analytics queries touch;
//! the full original submission always travels along in `raw_data`, so the
//! schema can grow new columns without losing history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized event ready for insertion, bound to its owning tenant.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub client_id: i32,
    pub visitor_id: String,
    pub session_id: String,
    pub page_url: String,
    pub page_title: Option<String>,
    pub referrer: Option<String>,
    pub event_type: String,
    pub sdk_version: Option<String>,
    /// Client-claimed timestamp, already parsed to UTC.
    pub sent_at: DateTime<Utc>,
    /// The complete original payload, stored verbatim.
    pub raw_data: serde_json::Value,
}

/// An event as read back from the store.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Monotonically assigned by the store.
    pub id: i64,
    pub client_id: i32,
    pub visitor_id: String,
    pub session_id: String,
    pub page_url: String,
    pub page_title: Option<String>,
    pub referrer: Option<String>,
    pub event_type: String,
    pub sdk_version: Option<String>,
    pub sent_at: DateTime<Utc>,
    /// Server-assigned ingestion timestamp.
    pub received_at: DateTime<Utc>,
    pub raw_data: serde_json::Value,
}

/// Acknowledgment for a successfully stored event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventReceipt {
    pub event_id: i64,
    pub received_at: DateTime<Utc>,
}
