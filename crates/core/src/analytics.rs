//! Read-model shaping for the analytics endpoints.
//!
//! All functions here are pure: the storage layer hands back rows already
//! scoped to one tenant and capped, and this module turns them into the
//! response shapes. Missing nested keys in `raw_data` yield nulls, never
//! errors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::event::StoredEvent;
use crate::json;

/// Cap for the recent-events feed.
pub const RECENT_LIMIT: i64 = 50;
/// How many error events the frequency table scans.
pub const ERROR_SCAN_LIMIT: i64 = 100;
/// How many of the scanned errors are listed in detail.
pub const ERROR_DETAIL_LIMIT: usize = 10;

/// Frequency key when an error event has no message.
const UNKNOWN_MESSAGE: &str = "Unknown";

/// Per-tenant aggregate counts, computed at a single read point.
#[derive(Debug, Clone, Default)]
pub struct EventSummary {
    pub total_events: i64,
    pub by_type: BTreeMap<String, i64>,
    pub unique_visitors: i64,
    /// Earliest `sent_at`, or `None` when the tenant has no events.
    pub first_event: Option<DateTime<Utc>>,
}

/// Type-dependent detail slots for the recent-events feed.
///
/// All three slots are always present; non-matching ones are null.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    pub error: Option<Value>,
    pub click: Option<Value>,
    pub load_time: Option<Value>,
}

/// One row of the recent-events feed.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub visitor: String,
    pub page: String,
    pub time: DateTime<Utc>,
    pub details: EventDetails,
}

impl EventView {
    pub fn from_stored(event: &StoredEvent) -> Self {
        let raw = &event.raw_data;
        let details = EventDetails {
            error: (event.event_type == "error")
                .then(|| json::lookup_owned(raw, &["error_info", "message"]))
                .flatten(),
            click: (event.event_type == "click")
                .then(|| json::lookup_owned(raw, &["click_info", "element"]))
                .flatten(),
            load_time: (event.event_type == "page_view")
                .then(|| json::lookup_owned(raw, &["performance", "load_time"]))
                .flatten(),
        };

        Self {
            id: event.id,
            event_type: event.event_type.clone(),
            visitor: event.visitor_id.clone(),
            page: event.page_url.clone(),
            time: event.sent_at,
            details,
        }
    }
}

/// One listed error in the error report.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: Option<Value>,
    pub file: Option<Value>,
    pub line: Option<Value>,
    pub page: String,
    pub time: DateTime<Utc>,
}

impl ErrorDetail {
    fn from_stored(event: &StoredEvent) -> Self {
        let raw = &event.raw_data;
        Self {
            message: json::lookup_owned(raw, &["error_info", "message"]),
            file: json::lookup_owned(raw, &["error_info", "file"]),
            line: json::lookup_owned(raw, &["error_info", "line"]),
            page: event.page_url.clone(),
            time: event.sent_at,
        }
    }
}

/// Error analytics for one tenant.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub total_errors: usize,
    pub recent_errors: Vec<ErrorDetail>,
    pub error_frequency: BTreeMap<String, u64>,
}

/// Builds the error report from the scanned window of error events.
///
/// The frequency table covers every scanned event; the detailed listing
/// shows only the first [`ERROR_DETAIL_LIMIT`].
pub fn error_report(events: &[StoredEvent]) -> ErrorReport {
    let mut error_frequency: BTreeMap<String, u64> = BTreeMap::new();
    for event in events {
        let message = json::lookup_str(&event.raw_data, &["error_info", "message"])
            .unwrap_or(UNKNOWN_MESSAGE);
        *error_frequency.entry(message.to_string()).or_default() += 1;
    }

    ErrorReport {
        total_errors: events.len(),
        recent_errors: events
            .iter()
            .take(ERROR_DETAIL_LIMIT)
            .map(ErrorDetail::from_stored)
            .collect(),
        error_frequency,
    }
}
