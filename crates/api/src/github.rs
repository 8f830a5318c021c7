// GitHub webhook (POST /api/v0/github)
//
// Signatures are checked by middleware; this handler only dispatches on the
// event header.

use axum::{body::Bytes, extract::State, http::HeaderMap, response::IntoResponse, response::Response};
use event_tracker_core::adapters::github::{main_branch_push, merged_pull_request};
use event_tracker_core::signature::github::{events, EVENT_HEADER};
use event_tracker_core::WriteMode;
use tracing::info;

use crate::response::{ack, ApiError, Envelope};
use crate::state::AppState;

pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let event_type = headers
        .get(EVENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let draft = match event_type {
        events::PING => return Ok(ack("pong").into_response()),
        events::PULL_REQUEST => merged_pull_request(&body)?,
        events::PUSH => main_branch_push(&body)?,
        other => {
            return Ok(ack(format!("GitHub event '{other}' not yet handled")).into_response())
        }
    };

    let Some(draft) = draft else {
        info!(event_type, "GitHub delivery does not describe a recordable event");
        return Ok(ack("no event recorded").into_response());
    };

    let event = state.recorder.record(draft, WriteMode::Commit).await?;
    Ok(Envelope::ok(event).into_response())
}
