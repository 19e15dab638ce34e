// ── Submission ──
//
// The transactional core (store the record, then ask for a payment
// session) runs inline; notifications are handed to the dispatcher and
// run as independent tasks afterwards.

pub mod dispatch;
pub mod orchestrator;

pub use dispatch::Dispatcher;
pub use orchestrator::{Orchestrator, SubmissionOutcome};
