// Source adapters
//
// Each adapter maps one external payload shape onto an EventDraft. They do
// no I/O; the HTTP layer feeds them request bodies and hands the drafts to
// the EventRecorder.

pub mod github;
pub mod slack;
