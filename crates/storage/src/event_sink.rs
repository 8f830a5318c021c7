// Database-backed EventSink implementation
//
// This module implements the core EventSink trait so the record pipeline can
// persist events without knowing about sqlx.

use async_trait::async_trait;
use event_tracker_core::{Event, EventSink, Result, TrackerError};

use crate::models::CreateEventRow;
use crate::repositories::Database;

/// Database-backed event sink
#[derive(Clone)]
pub struct DbEventSink {
    db: Database,
}

impl DbEventSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventSink for DbEventSink {
    async fn insert(&self, event: &Event) -> Result<()> {
        self.db
            .insert_event(CreateEventRow::from(event))
            .await
            .map_err(persistence_error)
    }
}

/// Storage failure as a Persistence error, message unchanged
fn persistence_error(err: anyhow::Error) -> TrackerError {
    TrackerError::persistence(err.to_string())
}
