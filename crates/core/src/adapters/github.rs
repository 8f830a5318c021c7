// GitHub webhook payload mapping
//
// Only the fields that decide whether a delivery becomes an event are typed;
// the full payload is kept as the event's metadata.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, TrackerError};
use crate::event::{event_types, EventDraft};
use crate::null_time::NullTime;

#[derive(Debug, Deserialize)]
struct PullRequestEvent {
    #[serde(default)]
    action: String,
    #[serde(default)]
    pull_request: PullRequestFields,
}

#[derive(Debug, Default, Deserialize)]
struct PullRequestFields {
    #[serde(default)]
    merged: bool,
    #[serde(default)]
    title: String,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct PushEvent {
    #[serde(rename = "ref", default)]
    git_ref: String,
    head_commit: Option<HeadCommit>,
    #[serde(default)]
    repository: PushRepository,
}

#[derive(Debug, Deserialize)]
struct HeadCommit {
    #[serde(default)]
    message: String,
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct PushRepository {
    #[serde(default)]
    default_branch: String,
    #[serde(default)]
    master_branch: Option<String>,
}

impl PushEvent {
    fn targets_main_branch(&self) -> bool {
        let is_branch = |name: &str| !name.is_empty() && self.git_ref == format!("refs/heads/{name}");
        is_branch(&self.repository.default_branch)
            || self.repository.master_branch.as_deref().is_some_and(is_branch)
    }
}

fn parse_payload(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|e| TrackerError::validation(e.to_string()))
}

/// Map a `pull_request` delivery to a draft
///
/// Returns `Ok(None)` for anything other than a merged pull request being
/// closed.
pub fn merged_pull_request(body: &[u8]) -> Result<Option<EventDraft>> {
    let payload = parse_payload(body)?;
    let event: PullRequestEvent = serde_json::from_value(payload.clone())
        .map_err(|e| TrackerError::validation(e.to_string()))?;

    if event.action != "closed" || !event.pull_request.merged {
        return Ok(None);
    }

    let mut draft = EventDraft::new(event_types::PULL_REQUEST, event.pull_request.title)
        .with_metadata(payload);
    draft.start_time = NullTime::from(event.pull_request.updated_at);
    Ok(Some(draft))
}

/// Map a `push` delivery to a draft
///
/// Returns `Ok(None)` unless the push updated the repository's default
/// (or legacy master) branch.
pub fn main_branch_push(body: &[u8]) -> Result<Option<EventDraft>> {
    let payload = parse_payload(body)?;
    let event: PushEvent = serde_json::from_value(payload.clone())
        .map_err(|e| TrackerError::validation(e.to_string()))?;

    if !event.targets_main_branch() {
        return Ok(None);
    }

    let (message, timestamp) = match event.head_commit {
        Some(commit) => (commit.message, commit.timestamp),
        None => (String::new(), None),
    };

    let mut draft = EventDraft::new(event_types::PUSH, message).with_metadata(payload);
    draft.start_time = NullTime::from(timestamp);
    Ok(Some(draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn pull_request(action: &str, merged: bool) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "action": action,
            "number": 7,
            "pull_request": {
                "html_url": "https://github.com/acme/web/pull/7",
                "merged": merged,
                "title": "Add retries",
                "body": "Retries failed uploads",
                "updated_at": "2024-05-01T10:00:00Z",
                "user": {"login": "octocat"}
            },
            "repository": {"full_name": "acme/web"}
        }))
        .unwrap()
    }

    fn push(git_ref: &str, master_branch: Option<&str>) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "ref": git_ref,
            "head_commit": {
                "message": "Fix typo in README",
                "timestamp": "2024-05-01T12:30:00-07:00",
                "url": "https://github.com/acme/web/commit/abc"
            },
            "repository": {
                "full_name": "acme/web",
                "default_branch": "main",
                "master_branch": master_branch
            },
            "pusher": {"name": "octocat"}
        }))
        .unwrap()
    }

    #[test]
    fn test_merged_pull_request_becomes_draft() {
        let body = pull_request("closed", true);
        let draft = merged_pull_request(&body).unwrap().unwrap();

        assert_eq!(draft.event_type, "PULL REQUEST");
        assert_eq!(draft.notes, "Add retries");
        assert_eq!(
            draft.start_time,
            NullTime::Present(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(draft.metadata["repository"]["full_name"], "acme/web");
        assert_eq!(draft.metadata["pull_request"]["user"]["login"], "octocat");
    }

    #[test]
    fn test_unmerged_or_open_pull_request_is_ignored() {
        assert!(merged_pull_request(&pull_request("closed", false))
            .unwrap()
            .is_none());
        assert!(merged_pull_request(&pull_request("opened", false))
            .unwrap()
            .is_none());
        assert!(merged_pull_request(&pull_request("synchronize", true))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_body_is_validation_error() {
        let err = merged_pull_request(b"{not json").unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[test]
    fn test_push_to_default_branch_becomes_draft() {
        let body = push("refs/heads/main", None);
        let draft = main_branch_push(&body).unwrap().unwrap();

        assert_eq!(draft.event_type, "PUSH");
        assert_eq!(draft.notes, "Fix typo in README");
        assert_eq!(
            draft.start_time,
            NullTime::Present(Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap())
        );
        assert_eq!(draft.metadata["pusher"]["name"], "octocat");
    }

    #[test]
    fn test_push_to_master_branch_becomes_draft() {
        let body = push("refs/heads/master", Some("master"));
        assert!(main_branch_push(&body).unwrap().is_some());
    }

    #[test]
    fn test_push_to_other_branches_is_ignored() {
        assert!(main_branch_push(&push("refs/heads/feature/main-menu", None))
            .unwrap()
            .is_none());
        assert!(main_branch_push(&push("refs/tags/main", None))
            .unwrap()
            .is_none());
        // An empty master_branch must not match every ref
        assert!(main_branch_push(&push("refs/heads/feature", Some("")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_branch_deletion_push_has_no_notes() {
        let body = serde_json::to_vec(&json!({
            "ref": "refs/heads/main",
            "head_commit": null,
            "repository": {"default_branch": "main"}
        }))
        .unwrap();
        let draft = main_branch_push(&body).unwrap().unwrap();
        assert!(draft.notes.is_empty());
        assert_eq!(draft.start_time, NullTime::Absent);
    }
}
