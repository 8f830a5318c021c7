// Log-channel notifier
//
// Posts a rendered summary of every committed event to one channel.

use async_trait::async_trait;
use event_tracker_core::notification::render_event_message;
use event_tracker_core::{Event, Notifier, Result};

use crate::client::SlackClient;

#[derive(Debug, Clone)]
pub struct SlackLogNotifier {
    client: SlackClient,
    channel: String,
}

impl SlackLogNotifier {
    pub fn new(client: SlackClient, channel: impl Into<String>) -> Self {
        Self {
            client,
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl Notifier for SlackLogNotifier {
    async fn notify(&self, event: &Event) -> Result<()> {
        let text = render_event_message(event);
        self.client.chat_post_message(&self.channel, &text).await?;
        Ok(())
    }
}
