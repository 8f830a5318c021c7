// Slack request signature verification
//
// Slack sends `X-Slack-Signature: v0=<hex>` and
// `X-Slack-Request-Timestamp: <unix seconds>`. The signed payload is the
// literal string "{version}:{timestamp}:{raw body}".

use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Result, TrackerError};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

/// Requests older than this many seconds are rejected as possible replays
pub const MAX_REQUEST_AGE_SECS: i64 = 5 * 60;

/// Verifier holding the signing secret
#[derive(Clone)]
pub struct SlackRequestVerifier {
    secret: Vec<u8>,
}

impl SlackRequestVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify a request against the current time
    pub fn verify(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        body: &[u8],
    ) -> Result<()> {
        self.verify_at(signature, timestamp, body, Utc::now())
    }

    /// Verify a request, treating `now` as the current time
    pub fn verify_at(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<()> {
        let signature_with_version = signature.filter(|s| !s.is_empty()).ok_or_else(|| {
            TrackerError::validation(format!("Missing \"{}\" header", SIGNATURE_HEADER))
        })?;

        let (version, signature_hex) =
            signature_with_version.split_once('=').ok_or_else(|| {
                TrackerError::validation(format!(
                    "Invalid signature format \"{}\"",
                    signature_with_version
                ))
            })?;

        let timestamp_str = timestamp.filter(|s| !s.is_empty()).ok_or_else(|| {
            TrackerError::validation(format!("Missing \"{}\" header", TIMESTAMP_HEADER))
        })?;

        let timestamp = timestamp_str
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| {
                TrackerError::validation(format!("Invalid timestamp: {}", timestamp_str))
            })?;

        if timestamp < now - TimeDelta::seconds(MAX_REQUEST_AGE_SECS) {
            return Err(TrackerError::authentication(format!(
                "Request is too old (timestamp = {}, now = {})",
                timestamp.to_rfc3339(),
                now.to_rfc3339()
            )));
        }

        let expected = hex::decode(signature_hex).map_err(|_| {
            TrackerError::validation(format!(
                "Invalid signature format \"{}\"",
                signature_with_version
            ))
        })?;

        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return Err(TrackerError::authentication("Invalid SHA256 signature"));
        };
        mac.update(version.as_bytes());
        mac.update(b":");
        mac.update(timestamp_str.as_bytes());
        mac.update(b":");
        mac.update(body);

        mac.verify_slice(&expected)
            .map_err(|_| TrackerError::authentication("Invalid SHA256 signature"))
    }
}

impl std::fmt::Debug for SlackRequestVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackRequestVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Computes the `X-Slack-Signature` value (`v0=<hex>`) for a request
pub fn compute_signature(timestamp: &str, body: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(format!("v0:{}:", timestamp).as_bytes());
    mac.update(body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"8f742231b10e8888abcd99yyyzzz85a5";

    fn ts(t: DateTime<Utc>) -> String {
        t.timestamp().to_string()
    }

    #[test]
    fn test_known_slack_documentation_vector() {
        // Example request from Slack's request verification guide
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        let timestamp = "1531420618";
        assert_eq!(
            compute_signature(timestamp, body, SECRET),
            "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503"
        );

        let now = DateTime::from_timestamp(1531420618 + 30, 0).unwrap();
        let verifier = SlackRequestVerifier::new(SECRET);
        assert!(verifier
            .verify_at(
                Some("v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503"),
                Some(timestamp),
                body,
                now
            )
            .is_ok());
    }

    #[test]
    fn test_one_minute_old_request_accepted() {
        let now = Utc::now();
        let timestamp = ts(now - TimeDelta::minutes(1));
        let body = b"command=%2Fincident&user_id=U123";
        let signature = compute_signature(&timestamp, body, SECRET);

        let verifier = SlackRequestVerifier::new(SECRET);
        assert!(verifier
            .verify_at(Some(&signature), Some(&timestamp), body, now)
            .is_ok());
    }

    #[test]
    fn test_six_minute_old_request_rejected() {
        let now = Utc::now();
        let timestamp = ts(now - TimeDelta::minutes(6));
        let body = b"command=%2Fincident&user_id=U123";
        let signature = compute_signature(&timestamp, body, SECRET);

        let verifier = SlackRequestVerifier::new(SECRET);
        let err = verifier
            .verify_at(Some(&signature), Some(&timestamp), body, now)
            .unwrap_err();
        assert!(matches!(err, TrackerError::Authentication(_)));
        assert!(err.to_string().starts_with("Request is too old"));
    }

    #[test]
    fn test_missing_headers() {
        let verifier = SlackRequestVerifier::new(SECRET);
        let err = verifier.verify(None, Some("1"), b"").unwrap_err();
        assert_eq!(err.to_string(), "Missing \"X-Slack-Signature\" header");

        let err = verifier.verify(Some("v0=00"), None, b"").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing \"X-Slack-Request-Timestamp\" header"
        );
    }

    #[test]
    fn test_malformed_signature_and_timestamp() {
        let verifier = SlackRequestVerifier::new(SECRET);
        let now = ts(Utc::now());

        let err = verifier.verify(Some("v0abcdef"), Some(&now), b"").unwrap_err();
        assert!(err.to_string().starts_with("Invalid signature format"));

        let err = verifier
            .verify(Some("v0=abcdef"), Some("yesterday"), b"")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid timestamp: yesterday");

        let err = verifier.verify(Some("v0=zz"), Some(&now), b"").unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = Utc::now();
        let timestamp = ts(now);
        let body = b"payload=%7B%7D";
        let signature = compute_signature(&timestamp, body, b"other-secret");

        let verifier = SlackRequestVerifier::new(SECRET);
        let err = verifier
            .verify_at(Some(&signature), Some(&timestamp), body, now)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid SHA256 signature");
    }

    #[test]
    fn test_version_is_part_of_signed_payload() {
        let now = Utc::now();
        let timestamp = ts(now);
        let body = b"x=1";
        let signature = compute_signature(&timestamp, body, SECRET);
        let relabeled = signature.replacen("v0=", "v1=", 1);

        let verifier = SlackRequestVerifier::new(SECRET);
        assert!(verifier
            .verify_at(Some(&relabeled), Some(&timestamp), body, now)
            .is_err());
    }

    proptest! {
        /// Property: any body signed within the window verifies, any tampered body does not
        #[test]
        fn prop_signed_within_window(
            body in proptest::collection::vec(any::<u8>(), 1..256),
            age_secs in 0i64..300,
            flip in 1u8..=255,
        ) {
            let now = Utc::now();
            let timestamp = ts(now - TimeDelta::seconds(age_secs));
            let signature = compute_signature(&timestamp, &body, SECRET);
            let verifier = SlackRequestVerifier::new(SECRET);

            prop_assert!(verifier.verify_at(Some(&signature), Some(&timestamp), &body, now).is_ok());

            let mut tampered = body.clone();
            tampered[0] ^= flip;
            prop_assert!(verifier.verify_at(Some(&signature), Some(&timestamp), &tampered, now).is_err());
        }
    }
}
