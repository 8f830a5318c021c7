// Event entity type
//
// An EventDraft is what a source adapter builds from external input, with
// unset fields left at their zero value. `validate_and_rectify` is the only
// way to turn a draft into an Event, so every persisted row has passed the
// same checks and carries an ID assigned exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{Result, TrackerError};
use crate::id::{EventId, IdGenerator};
use crate::null_time::NullTime;

/// Event types recognized by the tracker
///
/// The direct API accepts any non-empty type; this list is informational.
pub mod event_types {
    pub const DEPLOYMENT: &str = "DEPLOYMENT";
    pub const MERGE: &str = "MERGE";
    pub const APP_RELEASE: &str = "APP RELEASE";
    pub const EXPERIMENT: &str = "EXPERIMENT";
    pub const OPS_ACTIVITY: &str = "OPS ACTIVITY";

    // Assigned by adapters
    pub const INCIDENT: &str = "INCIDENT";
    pub const PULL_REQUEST: &str = "PULL REQUEST";
    pub const PUSH: &str = "PUSH";

    pub const ALL: &[&str] = &[
        DEPLOYMENT,
        MERGE,
        APP_RELEASE,
        EXPERIMENT,
        OPS_ACTIVITY,
        INCIDENT,
        PULL_REQUEST,
        PUSH,
    ];

    pub fn is_known(event_type: &str) -> bool {
        ALL.contains(&event_type)
    }
}

/// Opaque JSON metadata, converted once at the adapter boundary
pub type Metadata = serde_json::Value;

/// How the write path treats a validated event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Insert the row and notify
    #[default]
    Commit,
    /// Log the statement that would have been executed; no durable side effect
    DryRun,
}

/// Candidate event as produced by a source adapter
///
/// Also the request body of the direct API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventDraft {
    /// Required. Any non-empty string is accepted.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "DEPLOYMENT"))]
    pub event_type: String,
    /// Required free-text description.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "v1.2.3 rollout"))]
    pub notes: String,
    /// Absent (or zero) means "now" at validation time
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub start_time: NullTime,
    /// Dropped unless strictly after start_time.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub end_time: NullTime,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metadata: Metadata,
}

impl EventDraft {
    pub fn new(event_type: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            notes: notes.into(),
            ..Default::default()
        }
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = NullTime::from_time(start_time);
        self
    }

    pub fn with_end_time(mut self, end_time: NullTime) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validate the draft against the current wall-clock time
    pub fn validate_and_rectify(self, ids: &dyn IdGenerator) -> Result<Event> {
        self.validate_and_rectify_at(ids, Utc::now())
    }

    /// Validate the draft, treating `now` as the current time
    ///
    /// 1. event_type must be non-empty
    /// 2. notes must be non-empty
    /// 3. unset start_time becomes `now`
    /// 4. end_time not strictly after start_time is cleared (not an error)
    /// 5. a fresh ID is assigned
    pub fn validate_and_rectify_at(self, ids: &dyn IdGenerator, now: DateTime<Utc>) -> Result<Event> {
        if self.event_type.is_empty() {
            return Err(TrackerError::validation("event_type parameter is required"));
        }
        if self.notes.is_empty() {
            return Err(TrackerError::validation("notes parameter is required"));
        }

        let start_time = self.start_time.as_option().unwrap_or(now);

        let mut end_time = self.end_time;
        if let NullTime::Present(end) = end_time {
            if end <= start_time {
                end_time.clear();
            }
        }

        Ok(Event {
            id: ids.next_id(),
            event_type: self.event_type,
            notes: self.notes,
            start_time,
            end_time,
            metadata: self.metadata,
        })
    }
}

/// Event - canonical record, ready for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    /// Randomly assigned positive 63-bit identifier.
    #[cfg_attr(feature = "openapi", schema(value_type = i64, example = 5577006791947779410i64))]
    pub id: EventId,
    /// Event type (e.g., "DEPLOYMENT", "INCIDENT").
    #[cfg_attr(feature = "openapi", schema(example = "DEPLOYMENT"))]
    pub event_type: String,
    /// Free-text description.
    pub notes: String,
    /// When the event started.
    pub start_time: DateTime<Utc>,
    /// When the event ended; null for instantaneous events.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub end_time: NullTime,
    /// Arbitrary JSON supplied by the source.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metadata: Metadata,
}

impl Event {
    pub fn is_known_type(&self) -> bool {
        event_types::is_known(&self.event_type)
    }
}
