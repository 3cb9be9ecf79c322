//! Submission validation and normalization.
//!
//! Validation (presence of the four required top-level fields) happens
//! before anything touches the store and maps to a 400. Everything after
//! that point -- nested extraction, timestamp parsing -- is a processing
//! failure: caught, logged with detail, and answered with a generic 500.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{Error, ProcessingKind, Result};
use crate::event::NewEvent;
use crate::json;

/// Top-level fields every submission must carry, checked in order.
pub const REQUIRED_FIELDS: [&str; 4] = ["event_type", "sent_at", "identifiers", "page_info"];

/// Checks the required top-level fields. A present-but-null field counts as
/// present; only absence fails.
pub fn check_required(payload: &Value) -> Result<()> {
    for field in REQUIRED_FIELDS {
        if payload.get(field).is_none() {
            return Err(Error::MissingField(field));
        }
    }
    Ok(())
}

/// Parses a client-claimed `sent_at` timestamp.
///
/// A trailing literal `Z` is normalized to `+00:00` before parsing.
/// Offset-less timestamps are accepted and taken as UTC.
pub fn parse_sent_at(raw: &str) -> Result<DateTime<Utc>> {
    let normalized = match raw.strip_suffix('Z') {
        Some(stripped) => Cow::Owned(format!("{stripped}+00:00")),
        None => Cow::Borrowed(raw),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| Error::Processing(ProcessingKind::BadTimestamp(raw.to_string())))
}

fn required_str<'a>(payload: &'a Value, path: &'static str, parts: &[&str]) -> Result<&'a str> {
    match json::lookup_str(payload, parts) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(Error::Processing(ProcessingKind::MissingNested(path))),
    }
}

impl NewEvent {
    /// Normalizes a validated submission into its insert shape.
    ///
    /// Callers must have passed [`check_required`] first; the nested
    /// structure is still untrusted here.
    pub fn from_payload(client_id: i32, payload: &Value) -> Result<NewEvent> {
        let event_type = required_str(payload, "event_type", &["event_type"])?;
        let visitor_id = required_str(
            payload,
            "identifiers.visitor_id",
            &["identifiers", "visitor_id"],
        )?;
        let session_id = required_str(
            payload,
            "identifiers.session_id",
            &["identifiers", "session_id"],
        )?;
        let page_url = required_str(payload, "page_info.url", &["page_info", "url"])?;

        let sent_at = match payload.get("sent_at").and_then(Value::as_str) {
            Some(raw) => parse_sent_at(raw)?,
            None => {
                let raw = payload.get("sent_at").cloned().unwrap_or(Value::Null);
                return Err(Error::Processing(ProcessingKind::BadTimestamp(
                    raw.to_string(),
                )));
            }
        };

        Ok(NewEvent {
            client_id,
            visitor_id: visitor_id.to_string(),
            session_id: session_id.to_string(),
            page_url: page_url.to_string(),
            page_title: json::lookup_str(payload, &["page_info", "title"]).map(String::from),
            referrer: json::lookup_str(payload, &["page_info", "referrer"]).map(String::from),
            event_type: event_type.to_string(),
            sdk_version: payload
                .get("sdk_version")
                .and_then(Value::as_str)
                .map(String::from),
            sent_at,
            raw_data: payload.clone(),
        })
    }
}
