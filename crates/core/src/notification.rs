// Chat notification text
//
// Merged pull requests get a readable summary pulled from the webhook payload
// stored in metadata. Everything else is posted as the event JSON in a code
// block.

use serde_json::Value;

use crate::event::{event_types, Event};

/// Render the chat message announcing `event`
pub fn render_event_message(event: &Event) -> String {
    if event.event_type == event_types::PULL_REQUEST {
        render_pull_request(event)
    } else {
        let json = serde_json::to_string(event).unwrap_or_else(|_| event.notes.clone());
        format!("```{}```", json)
    }
}

fn render_pull_request(event: &Event) -> String {
    let metadata = &event.metadata;
    let field = |pointer: &str| -> String {
        match metadata.pointer(pointer) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    };

    format!(
        "*PR merged into {} by {} at {}*\n<{}|{}>\n{}",
        field("/repository/full_name"),
        field("/pull_request/user/login"),
        event.start_time.format("%a, %d %b %Y %H:%M:%S UTC"),
        field("/pull_request/html_url"),
        field("/pull_request/title"),
        field("/pull_request/body"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;
    use crate::id::SequentialIdGenerator;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_pull_request_message() {
        let ids = SequentialIdGenerator::new();
        let event = EventDraft::new(event_types::PULL_REQUEST, "Add retries")
            .with_start_time(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap())
            .with_metadata(json!({
                "action": "closed",
                "repository": {"full_name": "acme/web"},
                "pull_request": {
                    "html_url": "https://github.com/acme/web/pull/7",
                    "title": "Add retries",
                    "body": "Retries failed uploads",
                    "user": {"login": "octocat"}
                }
            }))
            .validate_and_rectify(&ids)
            .unwrap();

        assert_eq!(
            render_event_message(&event),
            "*PR merged into acme/web by octocat at Mon, 02 Jan 2006 15:04:05 UTC*\n\
             <https://github.com/acme/web/pull/7|Add retries>\n\
             Retries failed uploads"
        );
    }

    #[test]
    fn test_pull_request_with_null_body() {
        let ids = SequentialIdGenerator::new();
        let event = EventDraft::new(event_types::PULL_REQUEST, "t")
            .with_metadata(json!({"pull_request": {"body": null, "title": "t"}}))
            .validate_and_rectify(&ids)
            .unwrap();
        let message = render_event_message(&event);
        assert!(message.starts_with("*PR merged into  by  at "));
        assert!(message.ends_with("<|t>\n"));
    }

    #[test]
    fn test_other_events_render_as_json_block() {
        let ids = SequentialIdGenerator::starting_at(3);
        let event = EventDraft::new("DEPLOYMENT", "v1.2.3 rollout")
            .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .validate_and_rectify(&ids)
            .unwrap();
        assert_eq!(
            render_event_message(&event),
            "```{\"id\":3,\"event_type\":\"DEPLOYMENT\",\"notes\":\"v1.2.3 rollout\",\
             \"start_time\":\"2024-01-01T00:00:00Z\",\"end_time\":null,\"metadata\":null}```"
        );
    }
}
