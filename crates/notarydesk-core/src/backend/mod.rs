// ── External collaborators ──
//
// The orchestrator only sees these traits. Hosted implementations over
// `notarydesk-api` live in `store`, `payments` and `notify`; tests swap in
// doubles.

pub mod notify;
pub mod payments;
pub mod store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{BookingRecord, BookingStatus, PaymentSession};
use crate::wizard::ValidatedDraft;

pub use notify::{CrmNotifier, EmailNotifier, SmsNotifier, WebhookNotifier};
pub use payments::HostedPayments;
pub use store::HostedStore;

/// Persistence for booking records.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a `pending` record. Taking a `ValidatedDraft` means nothing
    /// unvalidated can reach the store.
    async fn create(&self, draft: &ValidatedDraft) -> Result<BookingRecord, CoreError>;

    async fn get(&self, id: Uuid) -> Result<BookingRecord, CoreError>;

    /// Overwrite the status. Any transition is accepted.
    async fn set_status(&self, id: Uuid, status: BookingStatus)
    -> Result<BookingRecord, CoreError>;
}

/// Payment-session provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_session(&self, record: &BookingRecord) -> Result<PaymentSession, CoreError>;
}

/// One best-effort notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name for logs (`email`, `sms`, ...).
    fn channel(&self) -> &'static str;

    /// Whether this channel should fire for the record at all.
    fn applies_to(&self, _record: &BookingRecord) -> bool {
        true
    }

    async fn notify(&self, record: &BookingRecord) -> Result<(), CoreError>;
}
