// Direct event recording (POST /api/v0/record)

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use event_tracker_core::{Event, EventDraft, WriteMode};

use crate::response::{ApiError, Envelope};
use crate::state::AppState;

/// POST /api/v0/record - Record an event
#[utoipa::path(
    post,
    path = "/api/v0/record",
    request_body = EventDraft,
    responses(
        (status = 200, description = "Event recorded", body = Envelope<Event>),
        (status = 400, description = "Missing event_type or notes, or malformed JSON"),
        (status = 500, description = "Event could not be stored")
    ),
    tag = "events"
)]
pub async fn record_event(
    State(state): State<AppState>,
    payload: Result<Json<EventDraft>, JsonRejection>,
) -> Result<Json<Envelope<Event>>, ApiError> {
    let Json(draft) = payload?;
    let event = state.recorder.record(draft, WriteMode::Commit).await?;
    Ok(Envelope::ok(event))
}
