// Error types for event recording
//
// Every entry path (direct API, source-control webhook, chat flows) reports
// failures through TrackerError so the HTTP layer can map them onto a single
// response envelope.

use thiserror::Error;

/// Result type alias for event tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while verifying, validating or recording an event
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Missing required field, malformed signature header, malformed timestamp
    #[error("{0}")]
    Validation(String),

    /// Signature mismatch or stale request timestamp
    #[error("{0}")]
    Authentication(String),

    /// The validated event could not be durably stored
    #[error("{0}")]
    Persistence(String),

    /// Chat delivery failed (never surfaced to the original caller)
    #[error("{0}")]
    Notification(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl TrackerError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }

    /// Create an authentication error
    pub fn authentication(msg: impl Into<String>) -> Self {
        TrackerError::Authentication(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        TrackerError::Persistence(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        TrackerError::Notification(msg.into())
    }

    /// Whether the caller sent something we refuse to process (as opposed to
    /// something going wrong on our side).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TrackerError::Validation(_) | TrackerError::Authentication(_)
        )
    }
}
