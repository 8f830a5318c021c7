// Database models (internal, may differ from the core Event)

use chrono::{DateTime, Utc};
use event_tracker_core::Event;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub event_type: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub metadata: Option<sqlx::types::JsonValue>,
    pub insert_time: Option<DateTime<Utc>>,
}

/// Column values for one INSERT
#[derive(Debug, Clone)]
pub struct CreateEventRow {
    pub id: i64,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: String,
    pub metadata: Json<serde_json::Value>,
}

impl From<&Event> for CreateEventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.get(),
            event_type: event.event_type.clone(),
            start_time: event.start_time,
            end_time: event.end_time.as_option(),
            notes: event.notes.clone(),
            metadata: Json(event.metadata.clone()),
        }
    }
}
