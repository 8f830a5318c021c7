// Dry-run statement rendering
//
// A dry run logs the INSERT that a committed write would have executed. The
// text is for humans reading logs; it is never executed and values are not
// escaped.

use chrono::SecondsFormat;

use crate::event::Event;

/// Render the INSERT statement for `event` as a diagnostic string
pub fn render_insert_statement(event: &Event) -> String {
    let end_time = event
        .end_time
        .as_option()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();

    format!(
        "
INSERT INTO events (
	id,
	event_type,
	start_time,
	end_time,
	notes,
	metadata
) VALUES (
	{},
	'{}',
	'{}',
	'{}',
	'{}',
	'{}'
)
",
        event.id,
        event.event_type,
        event.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        end_time,
        event.notes,
        event.metadata,
    )
}
