//! Standardized API responses.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use collector_core::{EventReceipt, EventSummary};
use serde::{Deserialize, Serialize};

/// Error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API error with HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<collector_core::Error> for ApiError {
    fn from(err: collector_core::Error) -> Self {
        Self {
            status: StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.public_message(),
        }
    }
}

/// Success response for registration. The key appears here and nowhere
/// else, ever again.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub api_key: String,
    pub message: String,
}

impl RegisterResponse {
    pub fn new(api_key: String) -> Self {
        Self {
            success: true,
            api_key,
            message: "Save this API key".to_string(),
        }
    }
}

/// Success response for ingestion.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub event_id: i64,
    pub received_at: DateTime<Utc>,
}

impl IngestResponse {
    pub fn new(receipt: EventReceipt) -> Self {
        Self {
            success: true,
            event_id: receipt.event_id,
            received_at: receipt.received_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Analytics summary response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub client: String,
    pub total_events: i64,
    pub by_type: BTreeMap<String, i64>,
    pub unique_visitors: i64,
    pub first_event: Option<DateTime<Utc>>,
}

impl SummaryResponse {
    pub fn new(client: String, summary: EventSummary) -> Self {
        Self {
            client,
            total_events: summary.total_events,
            by_type: summary.by_type,
            unique_visitors: summary.unique_visitors,
            first_event: summary.first_event,
        }
    }
}
