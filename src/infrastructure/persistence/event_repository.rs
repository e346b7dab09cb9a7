//! PostgreSQL implementation of the event store

use crate::domain::event::{EventRepository, StoredEvent};
use crate::domain::shared::{DomainError, EventId, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, error};

#[derive(FromRow)]
struct EventRow {
    id: i64,
    #[sqlx(rename = "type")]
    event_type: String,
    payload: String,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for StoredEvent {
    fn from(r: EventRow) -> Self {
        StoredEvent {
            id: EventId::new(r.id),
            event_type: r.event_type,
            payload: r.payload,
            created_at: r.created_at,
        }
    }
}

/// Event store backed by the `events` table.
///
/// Every call checks a connection out of the pool and hands it back when the
/// guard drops, on success and on error alike.
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(op: &str, e: sqlx::Error) -> DomainError {
    error!("Failed to {}: {}", op, e);
    DomainError::from(e)
}

#[async_trait]
impl EventRepository for PgEventStore {
    async fn insert(&self, event_type: &str, payload: &str) -> Result<EventId> {
        debug!("Inserting event of type {}", event_type);

        // Uncommitted transactions roll back when dropped
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (type, payload)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(event_type)
        .bind(payload)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error("insert event", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("commit event", e))?;

        debug!("Stored event {}", id);
        Ok(EventId::new(id))
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<StoredEvent>> {
        debug!("Listing events (limit: {:?})", limit);

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| storage_error("acquire connection", e))?;

        // LIMIT NULL is LIMIT ALL
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, type, payload, created_at
            FROM events
            ORDER BY id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| storage_error("list events", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| storage_error("acquire connection", e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| storage_error("count events", e))?;

        Ok(count)
    }
}
