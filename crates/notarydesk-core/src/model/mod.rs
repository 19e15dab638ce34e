// ── Booking domain model ──
//
// Canonical types shared by the wizard, the orchestrator and the CLI.
// Wire shapes live in `notarydesk_api`; `crate::convert` bridges the two.

pub mod draft;
pub mod notice;
pub mod payment;
pub mod record;
pub mod service;

// ── Re-exports ──────────────────────────────────────────────────────

pub use draft::BookingDraft;
pub use notice::{Notice, NoticeLevel};
pub use payment::PaymentSession;
pub use record::{BookingRecord, BookingStatus};
pub use service::{AddOn, ServiceType};
