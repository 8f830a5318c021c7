// Slack slash command and interactive submission
//
// POST /api/v0/slack/command      - reply with the incident form
// POST /api/v0/slack/interaction  - record the submitted incident

use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use chrono::Utc;
use event_tracker_core::adapters::slack::{
    incident_form, submission_reply, InteractionPayload, SlashCommand,
};
use event_tracker_core::WriteMode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::response::{ack, ApiError, Envelope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    pub payload: Option<String>,
}

pub async fn command(
    State(state): State<AppState>,
    form: Result<Form<SlashCommand>, FormRejection>,
) -> Result<Json<Value>, ApiError> {
    let Form(command) = form?;
    info!(command = %command.command, user_id = %command.user_id, "Slash command");

    let tz_offset = state.chat.user_tz_offset(&command.user_id).await?;
    Ok(Json(incident_form(Utc::now(), tz_offset)))
}

pub async fn interaction(
    State(state): State<AppState>,
    form: Result<Form<InteractionForm>, FormRejection>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    let Form(form) = form?;
    let payload = InteractionPayload::parse(form.payload.as_deref())?;
    payload.validate()?;

    if !payload.is_submission() {
        return Ok(ack(""));
    }

    let tz_offset = state.chat.user_tz_offset(&payload.user.id).await?;
    let submission = payload.parse_state(tz_offset)?;
    let mode = submission.mode;
    let event = state.recorder.record(submission.draft, mode).await?;

    let reply = submission_reply(&payload.user.id, &event);
    let chat = state.chat.clone();
    let channel = payload.channel.id;
    let response_url = payload.response_url;
    tokio::spawn(async move {
        let result = match mode {
            WriteMode::Commit => chat.post_message(&channel, &reply).await,
            WriteMode::DryRun => chat.respond(&response_url, &reply).await,
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to reply to Slack interaction");
        }
    });

    Ok(ack(""))
}
