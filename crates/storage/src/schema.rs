//! Schema bootstrap.
//!
//! Idempotent DDL executed at startup. Typed columns cover only what the
//! fixed analytics queries filter, group, or sort on; everything else
//! lives in `raw_data`.

use sqlx::PgPool;

use crate::error::Result;

const CREATE_CLIENTS: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id          SERIAL PRIMARY KEY,
    key_hash    VARCHAR(64) NOT NULL UNIQUE,
    name        VARCHAR(100) NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_active   BOOLEAN NOT NULL DEFAULT TRUE
)
"#;

const CREATE_EVENTS: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id          BIGSERIAL PRIMARY KEY,
    client_id   INTEGER NOT NULL REFERENCES clients(id),
    visitor_id  VARCHAR(100) NOT NULL,
    session_id  VARCHAR(100) NOT NULL,
    page_url    TEXT NOT NULL,
    page_title  TEXT,
    referrer    TEXT,
    event_type  VARCHAR(20) NOT NULL,
    sdk_version VARCHAR(20),
    sent_at     TIMESTAMPTZ NOT NULL,
    received_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    raw_data    JSONB NOT NULL
)
"#;

/// Backs the recent feed and the per-type scans.
const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_events_client_sent ON events (client_id, sent_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_events_client_type_sent ON events (client_id, event_type, sent_at DESC)",
];

/// Creates tables and indexes if they do not exist.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_CLIENTS).execute(pool).await?;
    sqlx::query(CREATE_EVENTS).execute(pool).await?;
    for stmt in CREATE_INDEXES {
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}
