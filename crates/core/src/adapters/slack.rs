// Slack slash-command and interactive-submission mapping
//
// The slash command answers with a Block Kit form. Submitting that form sends
// an interaction payload whose `state.values` holds every input keyed by
// block ID then action ID. Date and time pickers report local wall-clock
// values, so the submitting user's UTC offset is needed to rebuild instants.

use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{Result, TrackerError};
use crate::event::{event_types, Event, EventDraft, WriteMode};
use crate::null_time::NullTime;

/// Action IDs used by the incident form
pub mod actions {
    pub const START_DATE: &str = "start-date-action";
    pub const START_TIME: &str = "start-time-action";
    pub const END_DATE: &str = "end-date-action";
    pub const END_TIME: &str = "end-time-action";
    pub const DESCRIPTION: &str = "description-action";
    pub const POSTMORTEM: &str = "postmortem-action";
    pub const METADATA: &str = "metadata-action";
    pub const CHECKBOX: &str = "checkbox-action";
    pub const SUBMIT: &str = "submit-button-action";
}

/// Checkbox option that turns a submission into a real write
pub const COMMIT_OPTION_VALUE: &str = "value-0";

// ============================================================================
// Slash command
// ============================================================================

/// Form fields of a slash-command request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub user_id: String,
}

/// Build the incident form, with pickers initialised to `now` in the user's
/// offset and the end pickers one year earlier.
///
/// An untouched end time is therefore before the start and gets cleared
/// during rectification.
pub fn incident_form(now: DateTime<Utc>, tz_offset_secs: i32) -> Value {
    let offset = FixedOffset::east_opt(tz_offset_secs).unwrap_or_else(|| Utc.fix());
    let local = now.with_timezone(&offset);
    let year_ago = local - TimeDelta::hours(24 * 365);

    let start_date = local.format("%Y-%m-%d").to_string();
    let end_date = year_ago.format("%Y-%m-%d").to_string();
    let time = local.format("%H:%M").to_string();

    json!({
        "blocks": [
            section_plain("Record a site incident by filling out the following data."),
            section_mrkdwn("*Incident Start Date and Time*"),
            pickers(&start_date, &time, actions::START_DATE, actions::START_TIME),
            section_mrkdwn(
                "*Incident End Date and Time*\nLeave unchanged if incident should be considered instantaneous."
            ),
            pickers(&end_date, &time, actions::END_DATE, actions::END_TIME),
            text_input(actions::DESCRIPTION, "Description of Incident", false),
            text_input(actions::POSTMORTEM, "Link to Postmortem", false),
            text_input(actions::METADATA, "Additional Metadata (JSON)", true),
            {
                "type": "actions",
                "elements": [
                    {
                        "type": "checkboxes",
                        "options": [
                            {
                                "text": plain_text("Do this for real"),
                                "description": plain_text("Leave unchecked to test this action."),
                                "value": COMMIT_OPTION_VALUE
                            }
                        ],
                        "action_id": actions::CHECKBOX
                    },
                    {
                        "type": "button",
                        "text": plain_text("Submit"),
                        "value": "click_me_123",
                        "action_id": actions::SUBMIT
                    }
                ]
            }
        ]
    })
}

fn plain_text(text: &str) -> Value {
    json!({"type": "plain_text", "text": text, "emoji": true})
}

fn section_plain(text: &str) -> Value {
    json!({"type": "section", "text": plain_text(text)})
}

fn section_mrkdwn(text: &str) -> Value {
    json!({"type": "section", "text": {"type": "mrkdwn", "text": text}})
}

fn pickers(date: &str, time: &str, date_action: &str, time_action: &str) -> Value {
    json!({
        "type": "actions",
        "elements": [
            {
                "type": "datepicker",
                "initial_date": date,
                "placeholder": plain_text("Select a date"),
                "action_id": date_action
            },
            {
                "type": "timepicker",
                "initial_time": time,
                "placeholder": plain_text("Select time"),
                "action_id": time_action
            }
        ]
    })
}

fn text_input(action_id: &str, label: &str, optional: bool) -> Value {
    json!({
        "type": "input",
        "optional": optional,
        "element": {"type": "plain_text_input", "action_id": action_id},
        "label": plain_text(label)
    })
}

// ============================================================================
// Interactive submission
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionAction {
    #[serde(default)]
    pub action_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionState {
    #[serde(default)]
    pub values: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionChannel {
    #[serde(default)]
    pub id: String,
}

/// The parts of a `block_actions` payload the incident flow reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user: InteractionUser,
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
    #[serde(default)]
    pub state: InteractionState,
    #[serde(default)]
    pub response_url: String,
    #[serde(default)]
    pub channel: InteractionChannel,
}

/// A parsed form submission, ready for the record pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentSubmission {
    pub draft: EventDraft,
    pub mode: WriteMode,
}

#[derive(Default)]
struct FormState {
    notes: String,
    postmortem: String,
    metadata: String,
    start_date: String,
    start_time: String,
    end_date: String,
    end_time: String,
    commit: bool,
}

impl InteractionPayload {
    /// Parse the `payload` form field
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let raw = raw
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TrackerError::validation("missing JSON payload"))?;
        serde_json::from_str(raw).map_err(|e| TrackerError::validation(e.to_string()))
    }

    /// Minimum shape every interaction must have
    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(TrackerError::validation("Must have at least one action"));
        }
        if self.response_url.is_empty() {
            return Err(TrackerError::validation("Request is missing the response_url"));
        }
        if self.channel.id.is_empty() {
            return Err(TrackerError::validation("Request is missing the channel id"));
        }
        Ok(())
    }

    /// Whether the interaction was the form's submit button
    pub fn is_submission(&self) -> bool {
        self.actions
            .first()
            .is_some_and(|a| a.action_id == actions::SUBMIT)
    }

    /// Turn the form state into an incident draft
    ///
    /// `tz_offset_secs` is the submitting user's offset from UTC.
    pub fn parse_state(&self, tz_offset_secs: i32) -> Result<IncidentSubmission> {
        let mut form = FormState::default();

        for block in self.state.values.values() {
            let block = block
                .as_object()
                .ok_or_else(|| TrackerError::validation("Bad block object"))?;

            for (action_id, value) in block {
                let value = value
                    .as_object()
                    .ok_or_else(|| TrackerError::validation("Bad action object"))?;

                match action_id.as_str() {
                    actions::DESCRIPTION => {
                        form.notes = optional_string_field(value, "value", "Bad description")?
                    }
                    actions::POSTMORTEM => {
                        form.postmortem = optional_string_field(value, "value", "Bad postmortem")?
                    }
                    actions::METADATA => {
                        form.metadata = optional_string_field(value, "value", "Bad metadata")?
                    }
                    actions::START_DATE => {
                        form.start_date = string_field(value, "selected_date", "Bad start date")?
                    }
                    actions::START_TIME => {
                        form.start_time = string_field(value, "selected_time", "Bad start time")?
                    }
                    actions::END_DATE => {
                        form.end_date = optional_string_field(value, "selected_date", "Bad end date")?
                    }
                    actions::END_TIME => {
                        form.end_time = optional_string_field(value, "selected_time", "Bad end time")?
                    }
                    actions::CHECKBOX => form.commit = commit_selected(value)?,
                    _ => {}
                }
            }
        }

        let offset = format_tz_offset(tz_offset_secs);

        let start_time = local_timestamp(&form.start_date, &form.start_time, &offset)
            .ok_or_else(|| TrackerError::validation("Bad start date and/or time"))?;

        let end_time = if form.end_date.is_empty() && form.end_time.is_empty() {
            NullTime::Absent
        } else {
            local_timestamp(&form.end_date, &form.end_time, &offset)
                .map(NullTime::from_time)
                .ok_or_else(|| TrackerError::validation("Bad end date and/or time"))?
        };

        let mut metadata = json!({ "postmortem": form.postmortem });
        if !form.metadata.is_empty() {
            let details: Value = serde_json::from_str(&form.metadata)
                .map_err(|_| TrackerError::validation("metadata must be valid json"))?;
            metadata["details"] = details;
        }

        let draft = EventDraft::new(event_types::INCIDENT, form.notes)
            .with_start_time(start_time)
            .with_end_time(end_time)
            .with_metadata(metadata);

        let mode = if form.commit {
            WriteMode::Commit
        } else {
            WriteMode::DryRun
        };

        Ok(IncidentSubmission { draft, mode })
    }
}

fn string_field(value: &Map<String, Value>, key: &str, error: &str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TrackerError::validation(error))
}

/// Like `string_field`, but a missing or null value reads as empty
fn optional_string_field(value: &Map<String, Value>, key: &str, error: &str) -> Result<String> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(TrackerError::validation(error)),
    }
}

fn commit_selected(value: &Map<String, Value>) -> Result<bool> {
    let options = value
        .get("selected_options")
        .and_then(Value::as_array)
        .ok_or_else(|| TrackerError::validation("Bad checkbox selected options"))?;

    for option in options {
        let option = option
            .as_object()
            .ok_or_else(|| TrackerError::validation("Bad checkbox option"))?;
        let value = option
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| TrackerError::validation("Bad checkbox option value"))?;
        if value == COMMIT_OPTION_VALUE {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Format an offset in seconds as `±HH:MM`, rounded to the nearest minute
pub fn format_tz_offset(tz_offset_secs: i32) -> String {
    let sign = if tz_offset_secs < 0 { '-' } else { '+' };
    let minutes = (tz_offset_secs.unsigned_abs() + 30) / 60;
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

fn local_timestamp(date: &str, time: &str, offset: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&format!("{date}T{time}:00{offset}"))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Text posted back to Slack once a submission has been recorded
pub fn submission_reply(user_id: &str, event: &Event) -> String {
    let rendered = serde_json::to_string_pretty(event).unwrap_or_default();
    format!(
        "<@{}> created event with the following parameters: ```{}```",
        user_id, rendered
    )
}
