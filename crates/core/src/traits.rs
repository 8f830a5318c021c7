// Core traits for pluggable backends
//
// These traits keep the record pipeline independent of where events go:
// - Postgres in production (event-tracker-storage)
// - Slack in production (event-tracker-slack)
// - In-memory implementations for tests (memory.rs)

use async_trait::async_trait;

use crate::error::Result;
use crate::event::Event;

// ============================================================================
// EventSink - Append-only persistence of validated events
// ============================================================================

/// Trait for durably storing a validated event
///
/// Implementations report failures as `TrackerError::Persistence`.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Insert a single event row
    async fn insert(&self, event: &Event) -> Result<()>;
}

// ============================================================================
// Notifier - Best-effort announcement of a persisted event
// ============================================================================

/// Trait for announcing a persisted event
///
/// Called from a detached task after the write succeeded; errors are logged
/// by the caller and never reach the original request.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &Event) -> Result<()>;
}

// ============================================================================
// ChatPlatform - Operations the chat flows need from the chat provider
// ============================================================================

/// Trait for the chat platform used by the slash-command and interaction flows
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// The user's timezone offset from UTC, in seconds
    async fn user_tz_offset(&self, user_id: &str) -> Result<i32>;

    /// Post a message to a channel
    async fn post_message(&self, channel: &str, text: &str) -> Result<()>;

    /// Reply through an interaction's response URL
    async fn respond(&self, response_url: &str, text: &str) -> Result<()>;
}
