// Request authenticity middleware
// Decision: Buffer the body once, verify it, then hand the same bytes to the handler
//
// Both webhook senders sign the exact raw body, so verification has to run
// before any extractor touches it.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use event_tracker_core::signature::{github, slack};
use event_tracker_core::GitHubSignatures;
use tracing::debug;

use crate::response::ApiError;
use crate::state::AppState;

/// GitHub caps webhook payloads at 25 MB
pub(crate) const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn buffer(request: Request) -> Result<(Parts, Bytes), ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::bad_request(format!("failed to read request body: {e}")))?;
    Ok((parts, bytes))
}

/// Reject GitHub deliveries whose SHA-1 or SHA-256 signature does not match
pub async fn verify_github(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, bytes) = buffer(request).await?;

    let signatures = GitHubSignatures {
        sha1: header(&parts.headers, github::SIGNATURE_SHA1_HEADER),
        sha256: header(&parts.headers, github::SIGNATURE_SHA256_HEADER),
        event: header(&parts.headers, github::EVENT_HEADER),
    };
    state.github.verify(signatures, &bytes)?;

    debug!(
        delivery = header(&parts.headers, github::DELIVERY_HEADER).unwrap_or_default(),
        "Verified GitHub delivery"
    );

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Reject Slack requests with a bad signature or a stale timestamp
pub async fn verify_slack(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, bytes) = buffer(request).await?;

    debug!(
        method = %parts.method,
        uri = %parts.uri,
        headers = ?parts.headers,
        body = %String::from_utf8_lossy(&bytes),
        "Slack request"
    );

    state.slack.verify(
        header(&parts.headers, slack::SIGNATURE_HEADER),
        header(&parts.headers, slack::TIMESTAMP_HEADER),
        &bytes,
    )?;

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
