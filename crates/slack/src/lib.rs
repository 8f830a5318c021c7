// Slack Integration
//
// This crate talks to the Slack Web API on behalf of the event tracker.
// It implements two core traits:
// - ChatPlatform: user timezone lookup, channel posts, response-URL replies
// - Notifier: announcing committed events in a log channel

mod client;
mod error;
mod notifier;

pub use client::{SlackClient, SlackUser, DEFAULT_API_URL};
pub use error::SlackError;
pub use notifier::SlackLogNotifier;
