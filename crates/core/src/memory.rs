// In-memory implementations for tests and local runs
//
// These mirror the production backends closely enough to drive the record
// pipeline and the HTTP routes without Postgres or Slack.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, TrackerError};
use crate::event::Event;
use crate::traits::{ChatPlatform, EventSink, Notifier};

// ============================================================================
// InMemoryEventSink
// ============================================================================

/// Event sink that appends to a vector
#[derive(Clone, Default)]
pub struct InMemoryEventSink {
    events: Arc<RwLock<Vec<Event>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail with `message`
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    pub async fn events(&self) -> Vec<Event> {
        self.events.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn insert(&self, event: &Event) -> Result<()> {
        if let Some(message) = self.failure.read().await.as_ref() {
            return Err(TrackerError::persistence(message.clone()));
        }
        let mut events = self.events.write().await;
        if events.iter().any(|e| e.id == event.id) {
            return Err(TrackerError::persistence(format!(
                "duplicate key value violates unique constraint \"events_pkey\" (id = {})",
                event.id
            )));
        }
        events.push(event.clone());
        Ok(())
    }
}

// ============================================================================
// RecordingNotifier
// ============================================================================

/// Notifier that remembers every event it was asked to announce
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notified: Arc<RwLock<Vec<Event>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose deliveries always fail (after recording the attempt)
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn notified(&self) -> Vec<Event> {
        self.notified.read().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &Event) -> Result<()> {
        self.notified.write().await.push(event.clone());
        if self.fail {
            return Err(TrackerError::notification("channel_not_found"));
        }
        Ok(())
    }
}

// ============================================================================
// InMemoryChatPlatform
// ============================================================================

/// A message delivered through the in-memory chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    Channel { channel: String, text: String },
    Response { response_url: String, text: String },
}

/// Chat platform with a fixed user offset that records outgoing messages
#[derive(Clone, Default)]
pub struct InMemoryChatPlatform {
    tz_offset: i32,
    messages: Arc<RwLock<Vec<ChatMessage>>>,
}

impl InMemoryChatPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every user reports this offset from UTC, in seconds
    pub fn with_tz_offset(mut self, tz_offset: i32) -> Self {
        self.tz_offset = tz_offset;
        self
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl ChatPlatform for InMemoryChatPlatform {
    async fn user_tz_offset(&self, _user_id: &str) -> Result<i32> {
        Ok(self.tz_offset)
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        self.messages.write().await.push(ChatMessage::Channel {
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn respond(&self, response_url: &str, text: &str) -> Result<()> {
        self.messages.write().await.push(ChatMessage::Response {
            response_url: response_url.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
