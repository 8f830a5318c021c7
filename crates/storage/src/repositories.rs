// Repository layer for database operations
//
// One append-only table. Rows are inserted once and never updated.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::models::*;

const MAX_CONNECTIONS: u32 = 10;

const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id BIGINT PRIMARY KEY,
    event_type VARCHAR(20) NOT NULL,
    start_time TIMESTAMPTZ DEFAULT NOW(),
    end_time TIMESTAMPTZ NULL DEFAULT NULL,
    notes TEXT DEFAULT NULL,
    metadata JSONB DEFAULT NULL,
    insert_time TIMESTAMPTZ DEFAULT NOW()
)
"#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self { pool })
    }

    /// Create the events table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_EVENTS_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create events table")?;
        info!("Events table ready");
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn insert_event(&self, input: CreateEventRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, event_type, start_time, end_time, notes, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(input.id)
        .bind(&input.event_type)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(&input.notes)
        .bind(&input.metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, event_type, start_time, end_time, notes, metadata, insert_time
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
