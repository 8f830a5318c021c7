// Shared application state

use std::sync::Arc;

use event_tracker_core::{ChatPlatform, EventRecorder, GitHubWebhookVerifier, SlackRequestVerifier};

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub recorder: EventRecorder,
    pub chat: Arc<dyn ChatPlatform>,
    pub github: Arc<GitHubWebhookVerifier>,
    pub slack: Arc<SlackRequestVerifier>,
}

impl AppState {
    pub fn new(
        recorder: EventRecorder,
        chat: Arc<dyn ChatPlatform>,
        github: GitHubWebhookVerifier,
        slack: SlackRequestVerifier,
    ) -> Self {
        Self {
            recorder,
            chat,
            github: Arc::new(github),
            slack: Arc::new(slack),
        }
    }
}
