//! PostgreSQL implementation of the [`Store`] trait.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use collector_core::{Client, EventReceipt, EventSummary, NewEvent, StoredEvent};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::store::Store;

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects a pool using the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool })
    }

    /// Wraps an existing pool (tests, migrations).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn client_from_row(row: &PgRow) -> std::result::Result<Client, sqlx::Error> {
    Ok(Client {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        is_active: row.try_get("is_active")?,
    })
}

fn event_from_row(row: &PgRow) -> std::result::Result<StoredEvent, sqlx::Error> {
    Ok(StoredEvent {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        visitor_id: row.try_get("visitor_id")?,
        session_id: row.try_get("session_id")?,
        page_url: row.try_get("page_url")?,
        page_title: row.try_get("page_title")?,
        referrer: row.try_get("referrer")?,
        event_type: row.try_get("event_type")?,
        sdk_version: row.try_get("sdk_version")?,
        sent_at: row.try_get("sent_at")?,
        received_at: row.try_get("received_at")?,
        raw_data: row.try_get("raw_data")?,
    })
}

const EVENT_COLUMNS: &str = "id, client_id, visitor_id, session_id, page_url, page_title, \
     referrer, event_type, sdk_version, sent_at, received_at, raw_data";

#[async_trait]
impl Store for PgStore {
    async fn create_client(&self, name: &str, key_hash: &str) -> Result<Client> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO clients (key_hash, name) VALUES ($1, $2) \
             RETURNING id, name, created_at, is_active",
        )
        .bind(key_hash)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        let client = client_from_row(&row)?;
        tx.commit().await?;
        Ok(client)
    }

    async fn find_active_client(&self, key_hash: &str) -> Result<Option<Client>> {
        let row = sqlx::query(
            "SELECT id, name, created_at, is_active FROM clients \
             WHERE key_hash = $1 AND is_active = TRUE",
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(client_from_row).transpose().map_err(Into::into)
    }

    async fn insert_event(&self, event: NewEvent) -> Result<EventReceipt> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO events (client_id, visitor_id, session_id, page_url, page_title, \
             referrer, event_type, sdk_version, sent_at, raw_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id, received_at",
        )
        .bind(event.client_id)
        .bind(&event.visitor_id)
        .bind(&event.session_id)
        .bind(&event.page_url)
        .bind(&event.page_title)
        .bind(&event.referrer)
        .bind(&event.event_type)
        .bind(&event.sdk_version)
        .bind(event.sent_at)
        .bind(&event.raw_data)
        .fetch_one(&mut *tx)
        .await?;

        let receipt = EventReceipt {
            event_id: row.try_get("id")?,
            received_at: row.try_get("received_at")?,
        };
        tx.commit().await?;
        Ok(receipt)
    }

    async fn summary(&self, client_id: i32) -> Result<EventSummary> {
        // One transaction so the four aggregates see a single snapshot even
        // while writes land concurrently.
        let mut tx = self.pool.begin().await?;

        let total_events: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE client_id = $1")
                .bind(client_id)
                .fetch_one(&mut *tx)
                .await?;

        let type_rows = sqlx::query(
            "SELECT event_type, COUNT(*) AS count FROM events \
             WHERE client_id = $1 GROUP BY event_type",
        )
        .bind(client_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut by_type = BTreeMap::new();
        for row in &type_rows {
            by_type.insert(
                row.try_get::<String, _>("event_type")?,
                row.try_get::<i64, _>("count")?,
            );
        }

        let unique_visitors: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT visitor_id) FROM events WHERE client_id = $1")
                .bind(client_id)
                .fetch_one(&mut *tx)
                .await?;

        let first_event: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MIN(sent_at) FROM events WHERE client_id = $1")
                .bind(client_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(EventSummary {
            total_events,
            by_type,
            unique_visitors,
            first_event,
        })
    }

    async fn recent_events(&self, client_id: i32, limit: i64) -> Result<Vec<StoredEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE client_id = $1 \
             ORDER BY sent_at DESC LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(client_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(event_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(Into::into)
    }

    async fn recent_errors(&self, client_id: i32, limit: i64) -> Result<Vec<StoredEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE client_id = $1 AND event_type = 'error' \
             ORDER BY sent_at DESC LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(client_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(event_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(Into::into)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
