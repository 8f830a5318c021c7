// Postgres storage layer with sqlx
//
// This crate provides the database implementation of the core EventSink:
// - Database: connection pool, schema bootstrap, event rows
// - DbEventSink: implements EventSink for the record pipeline

pub mod event_sink;
pub mod models;
pub mod repositories;

pub use event_sink::DbEventSink;
pub use models::*;
pub use repositories::*;
