//! Booking logic between `notarydesk-api` and the CLI.
//!
//! - **[`BookingWizard`]**: the form state controller. Holds the current
//!   step and the raw field values of one draft; only advances when the
//!   active step validates.
//!
//! - **[`wizard::validate`]**: pure per-step validators driven by the
//!   declarative [`wizard::STEPS`] table. Passing every step yields a
//!   [`ValidatedDraft`], the only input the orchestrator accepts.
//!
//! - **[`Orchestrator`]**: persists the record, requests a payment
//!   session, then dispatches best-effort notifications as independent
//!   tasks. User-visible effects go through a [`Presenter`].
//!
//! - **[`Desk`]**: lifecycle-scoped facade wiring the hosted collaborators
//!   together. Construct once, call [`Desk::shutdown`] before exit.

pub mod backend;
pub mod config;
pub mod convert;
pub mod desk;
pub mod error;
pub mod model;
pub mod presenter;
pub mod submit;
pub mod wizard;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{BookingStore, Notifier, PaymentGateway};
pub use config::{BackendConfig, BusinessProfile, TlsVerification};
pub use desk::Desk;
pub use error::CoreError;
pub use model::{
    AddOn, BookingDraft, BookingRecord, BookingStatus, Notice, NoticeLevel, PaymentSession,
    ServiceType,
};
pub use presenter::Presenter;
pub use submit::{Orchestrator, SubmissionOutcome};
pub use wizard::{Advance, BookingWizard, FieldErrors, FieldId, StepId, ValidatedDraft};
