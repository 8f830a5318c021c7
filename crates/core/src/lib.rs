// Event Tracker Core
//
// This crate holds everything about an event that does not need a database
// or an HTTP server:
// - The Event model and its validate-and-rectify step (event.rs)
// - A nullable timestamp that serializes to JSON null (null_time.rs)
// - Event ID generation behind a trait so tests can be deterministic (id.rs)
// - Request signature verification for GitHub and Slack (signature/)
// - Payload mapping for each event source (adapters/)
// - The record pipeline: validate, persist or dry-run, notify (recorder.rs)
//
// Persistence, notification and chat access are traits (traits.rs) with
// Postgres and Slack implementations in sibling crates.

pub mod error;
pub mod event;
pub mod id;
pub mod null_time;
pub mod signature;
pub mod traits;

pub mod adapters;
pub mod dry_run;
pub mod notification;
pub mod recorder;

// In-memory implementations for testing
pub mod memory;

// Re-exports for convenience
pub use error::{Result, TrackerError};
pub use event::{event_types, Event, EventDraft, Metadata, WriteMode};
pub use id::{EventId, IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use null_time::NullTime;
pub use recorder::EventRecorder;
pub use signature::{GitHubSignatures, GitHubWebhookVerifier, SlackRequestVerifier};
pub use traits::{ChatPlatform, EventSink, Notifier};
