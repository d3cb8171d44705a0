//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete
//! implementation of the `HistoryStore` port from the `core` crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fuelsplit_core::domain::{HistoryEntry, Session, SCHEMA_VERSION};
use fuelsplit_core::ports::{HistoryStore, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

/// The list endpoint caps its response at the most recent entries.
const LIST_LIMIT: i64 = 50;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `HistoryStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SessionRecord {
    id: Uuid,
    created_at: DateTime<Utc>,
    payload: serde_json::Value,
}

impl SessionRecord {
    /// Rehydrates the canonical session from the stored payload. Rows
    /// whose payload no longer parses (a foreign writer, a pre-canonical
    /// schema) yield `None` and are dropped from the listing.
    fn to_domain(self) -> Option<HistoryEntry> {
        match serde_json::from_value::<Session>(self.payload) {
            Ok(session) => Some(HistoryEntry {
                id: self.id,
                created_at: self.created_at,
                session,
            }),
            Err(e) => {
                warn!(id = %self.id, "Skipping history row with unreadable payload: {e}");
                None
            }
        }
    }
}

//=========================================================================================
// `HistoryStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl HistoryStore for DbAdapter {
    async fn list_entries(&self) -> PortResult<Vec<HistoryEntry>> {
        let records = sqlx::query_as::<_, SessionRecord>(
            "SELECT id, created_at, payload FROM fuel_sessions \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(LIST_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unreachable(e.to_string()))?;

        Ok(records.into_iter().filter_map(SessionRecord::to_domain).collect())
    }

    async fn append_session(&self, session: &Session) -> PortResult<Uuid> {
        if session.schema_version != SCHEMA_VERSION {
            return Err(PortError::Rejected(format!(
                "unsupported schema version {}",
                session.schema_version
            )));
        }

        let payload =
            serde_json::to_value(session).map_err(|e| PortError::Rejected(e.to_string()))?;

        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO fuel_sessions \
             (id, created_at, fuel, trip_mode, rate, total_cost, total_liters, payload) \
             VALUES ($1, now(), $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(session.fuel.as_str())
        .bind(session.mode.as_str())
        .bind(session.rate_per_liter)
        .bind(session.total_cost)
        .bind(session.total_liters)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unreachable(e.to_string()))?;

        Ok(id)
    }

    async fn clear_all(&self) -> PortResult<()> {
        sqlx::query("DELETE FROM fuel_sessions")
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unreachable(e.to_string()))?;
        Ok(())
    }
}
