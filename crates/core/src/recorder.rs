// Record pipeline
//
// Every entry path ends here: validate and rectify the draft, then either
// persist it (and announce it in the background) or log the statement a
// dry run would have executed.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dry_run::render_insert_statement;
use crate::error::{Result, TrackerError};
use crate::event::{Event, EventDraft, WriteMode};
use crate::id::IdGenerator;
use crate::traits::{EventSink, Notifier};

/// Validates drafts and hands them to the configured backends
#[derive(Clone)]
pub struct EventRecorder {
    sink: Arc<dyn EventSink>,
    notifier: Option<Arc<dyn Notifier>>,
    ids: Arc<dyn IdGenerator>,
}

impl EventRecorder {
    pub fn new(sink: Arc<dyn EventSink>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            sink,
            notifier: None,
            ids,
        }
    }

    /// Announce committed events through `notifier`
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validate, rectify and write `draft`
    ///
    /// Returns the event as it was (or, for a dry run, would have been)
    /// stored. The insert completes before this returns; the notification
    /// does not.
    pub async fn record(&self, draft: EventDraft, mode: WriteMode) -> Result<Event> {
        let event = draft.validate_and_rectify(self.ids.as_ref())?;

        if !event.is_known_type() {
            debug!(event_type = %event.event_type, "Recording event with unrecognized type");
        }

        match mode {
            WriteMode::Commit => {
                self.sink.insert(&event).await.map_err(|e| match e {
                    TrackerError::Persistence(_) => e,
                    other => TrackerError::persistence(other.to_string()),
                })?;
                info!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    "Recorded event"
                );
                self.spawn_notification(&event);
            }
            WriteMode::DryRun => {
                info!(
                    event_id = %event.id,
                    statement = %render_insert_statement(&event),
                    "Dry run, event not persisted"
                );
            }
        }

        Ok(event)
    }

    fn spawn_notification(&self, event: &Event) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        let event = event.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&event).await {
                warn!(event_id = %event.id, error = %e, "Failed to announce event");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIdGenerator;
    use crate::memory::{InMemoryEventSink, RecordingNotifier};
    use std::time::Duration;

    fn recorder(sink: &InMemoryEventSink, notifier: &RecordingNotifier) -> EventRecorder {
        EventRecorder::new(
            Arc::new(sink.clone()),
            Arc::new(SequentialIdGenerator::new()),
        )
        .with_notifier(Arc::new(notifier.clone()))
    }

    async fn wait_for_notifications(notifier: &RecordingNotifier, count: usize) {
        for _ in 0..50 {
            if notifier.notified().await.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_commit_persists_and_notifies() {
        let sink = InMemoryEventSink::new();
        let notifier = RecordingNotifier::new();
        let recorder = recorder(&sink, &notifier);

        let event = recorder
            .record(EventDraft::new("DEPLOYMENT", "v1.2.3 rollout"), WriteMode::Commit)
            .await
            .unwrap();

        assert_eq!(sink.events().await, vec![event.clone()]);
        wait_for_notifications(&notifier, 1).await;
        assert_eq!(notifier.notified().await, vec![event]);
    }

    #[tokio::test]
    async fn test_dry_run_has_no_side_effects() {
        let sink = InMemoryEventSink::new();
        let notifier = RecordingNotifier::new();
        let recorder = recorder(&sink, &notifier);

        let event = recorder
            .record(EventDraft::new("INCIDENT", "db failover"), WriteMode::DryRun)
            .await
            .unwrap();

        assert!(event.id.get() > 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(sink.is_empty().await);
        assert!(notifier.notified().await.is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_short_circuits() {
        let sink = InMemoryEventSink::new();
        let notifier = RecordingNotifier::new();
        let recorder = recorder(&sink, &notifier);

        let err = recorder
            .record(EventDraft::new("DEPLOYMENT", ""), WriteMode::Commit)
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::Validation(_)));
        assert!(sink.is_empty().await);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_reported_and_not_notified() {
        let sink = InMemoryEventSink::new();
        sink.fail_with("connection refused").await;
        let notifier = RecordingNotifier::new();
        let recorder = recorder(&sink, &notifier);

        let err = recorder
            .record(EventDraft::new("DEPLOYMENT", "x"), WriteMode::Commit)
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::Persistence(_)));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(notifier.notified().await.is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_record() {
        let sink = InMemoryEventSink::new();
        let notifier = RecordingNotifier::failing();
        let recorder = recorder(&sink, &notifier);

        let result = recorder
            .record(EventDraft::new("MERGE", "main"), WriteMode::Commit)
            .await;

        assert!(result.is_ok());
        wait_for_notifications(&notifier, 1).await;
        assert_eq!(notifier.notified().await.len(), 1);
        assert_eq!(sink.len().await, 1);
    }
}
