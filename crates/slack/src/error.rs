// Slack client errors

use event_tracker_core::TrackerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Slack API error in {method}: {error}")]
    Api { method: String, error: String },

    #[error("Failed to decode Slack response: {0}")]
    Decode(String),
}

impl From<SlackError> for TrackerError {
    fn from(err: SlackError) -> Self {
        match err {
            SlackError::Http(_) | SlackError::Status { .. } | SlackError::Api { .. } => {
                TrackerError::notification(err.to_string())
            }
            SlackError::Decode(_) => TrackerError::Internal(anyhow::anyhow!(err)),
        }
    }
}
