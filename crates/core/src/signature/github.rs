// GitHub webhook signature verification
//
// GitHub signs deliveries twice with the shared secret:
// - `X-Hub-Signature: sha1=<40 hex>`
// - `X-Hub-Signature-256: sha256=<64 hex>`
// Both must verify against the exact raw body bytes.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

use crate::error::{Result, TrackerError};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_SHA1_HEADER: &str = "X-Hub-Signature";
pub const SIGNATURE_SHA256_HEADER: &str = "X-Hub-Signature-256";
pub const EVENT_HEADER: &str = "X-GitHub-Event";
pub const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

const SHA1_PREFIX: &str = "sha1=";
const SHA256_PREFIX: &str = "sha256=";
const SHA1_HEX_LEN: usize = 40;
const SHA256_HEX_LEN: usize = 64;

/// Values of the `X-GitHub-Event` header we act on
pub mod events {
    pub const PULL_REQUEST: &str = "pull_request";
    pub const PUSH: &str = "push";
    pub const PING: &str = "ping";

    pub fn is_handled(event: &str) -> bool {
        matches!(event, PULL_REQUEST | PUSH | PING)
    }
}

/// Signature-related header values of one delivery
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHubSignatures<'a> {
    pub sha1: Option<&'a str>,
    pub sha256: Option<&'a str>,
    pub event: Option<&'a str>,
}

/// Verifier holding the webhook secret
#[derive(Clone)]
pub struct GitHubWebhookVerifier {
    secret: Vec<u8>,
}

impl GitHubWebhookVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify both signatures against `body`
    ///
    /// A missing or malformed header is a validation error; a digest mismatch
    /// is an authentication error. An unrecognized event type is only logged.
    pub fn verify(&self, signatures: GitHubSignatures<'_>, body: &[u8]) -> Result<()> {
        let sha1_header = non_empty(signatures.sha1).ok_or_else(|| {
            TrackerError::validation(format!("Missing \"{}\" header", SIGNATURE_SHA1_HEADER))
        })?;
        let sha256_header = non_empty(signatures.sha256).ok_or_else(|| {
            TrackerError::validation(format!("Missing \"{}\" header", SIGNATURE_SHA256_HEADER))
        })?;

        let sha1_expected = parse_sha1_header(sha1_header).ok_or_else(|| {
            TrackerError::validation(format!("Malformed \"{}\" header", SIGNATURE_SHA1_HEADER))
        })?;
        let sha256_expected = parse_sha256_header(sha256_header).ok_or_else(|| {
            TrackerError::validation(format!("Malformed \"{}\" header", SIGNATURE_SHA256_HEADER))
        })?;

        if !verify_sha1(&self.secret, body, &sha1_expected) {
            return Err(TrackerError::authentication("Invalid SHA1 signature"));
        }
        if !verify_sha256(&self.secret, body, &sha256_expected) {
            return Err(TrackerError::authentication("Invalid SHA256 signature"));
        }

        let event = signatures.event.unwrap_or_default();
        if !events::is_handled(event) {
            tracing::info!(github_event = %event, "GitHub event type not handled");
        }

        Ok(())
    }
}

impl std::fmt::Debug for GitHubWebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubWebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_prefixed_hex(header: &str, prefix: &str, hex_len: usize) -> Option<Vec<u8>> {
    let hex_sig = header.strip_prefix(prefix)?;
    if hex_sig.len() != hex_len {
        return None;
    }
    hex::decode(hex_sig).ok()
}

/// Parses `sha1=<40 hex chars>` into the 20 raw digest bytes
pub fn parse_sha1_header(header: &str) -> Option<Vec<u8>> {
    parse_prefixed_hex(header, SHA1_PREFIX, SHA1_HEX_LEN)
}

/// Parses `sha256=<64 hex chars>` into the 32 raw digest bytes
pub fn parse_sha256_header(header: &str) -> Option<Vec<u8>> {
    parse_prefixed_hex(header, SHA256_PREFIX, SHA256_HEX_LEN)
}

fn verify_sha1(secret: &[u8], payload: &[u8], expected: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha1::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    // Constant-time comparison via the HMAC library
    mac.verify_slice(expected).is_ok()
}

fn verify_sha256(secret: &[u8], payload: &[u8], expected: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(expected).is_ok()
}

/// HMAC-SHA1 of `payload`, for signing test deliveries
pub fn compute_sha1(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// HMAC-SHA256 of `payload`, for signing test deliveries
pub fn compute_sha256(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a digest as an `X-Hub-Signature` value
pub fn format_sha1_header(signature: &[u8]) -> String {
    format!("{}{}", SHA1_PREFIX, hex::encode(signature))
}

/// Formats a digest as an `X-Hub-Signature-256` value
pub fn format_sha256_header(signature: &[u8]) -> String {
    format!("{}{}", SHA256_PREFIX, hex::encode(signature))
}

/// Both header values for `payload`, as GitHub would send them
pub fn sign_payload(payload: &[u8], secret: &[u8]) -> (String, String) {
    (
        format_sha1_header(&compute_sha1(payload, secret)),
        format_sha256_header(&compute_sha256(payload, secret)),
    )
}
