// Request authenticity verification
//
// Two schemes gate the webhook entry points before any payload is parsed:
// - github: HMAC-SHA1 and HMAC-SHA256 over the raw body, both required
// - slack: HMAC-SHA256 over "{version}:{timestamp}:{body}" with a 5 minute
//   replay window
//
// Verifiers are stateless and transport-agnostic: they take header values
// and body bytes, and return Ok(()) or a TrackerError.

pub mod github;
pub mod slack;

pub use github::{GitHubSignatures, GitHubWebhookVerifier};
pub use slack::SlackRequestVerifier;
