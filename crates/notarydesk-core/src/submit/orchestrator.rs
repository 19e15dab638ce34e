// Submission orchestrator.
//
// Sequence for one validated draft:
//   1. create the record           -> on failure: error toast, stop
//                                     (reply unreadable: "not confirmed" toast, stop)
//   2. request a payment session   -> on failure: error toast, record stays pending
//   3. dispatch notifications      -> never awaited, never surfaced
//   4. redirect to checkout

use std::sync::Arc;

use tracing::{info, warn};

use super::dispatch::Dispatcher;
use crate::backend::{BookingStore, Notifier, PaymentGateway};
use crate::config::BusinessProfile;
use crate::error::CoreError;
use crate::model::{BookingRecord, Notice, PaymentSession};
use crate::presenter::Presenter;
use crate::wizard::ValidatedDraft;

/// How a submission ended when a record was created.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Record stored and the customer was sent to checkout.
    Redirected {
        record: BookingRecord,
        session: PaymentSession,
    },
    /// Record stored (and left `pending`), but no checkout session.
    PaymentUnavailable {
        record: BookingRecord,
        error: CoreError,
    },
}

impl SubmissionOutcome {
    pub fn record(&self) -> &BookingRecord {
        match self {
            Self::Redirected { record, .. } | Self::PaymentUnavailable { record, .. } => record,
        }
    }
}

pub struct Orchestrator {
    store: Arc<dyn BookingStore>,
    payments: Arc<dyn PaymentGateway>,
    notifiers: Vec<Arc<dyn Notifier>>,
    dispatcher: Dispatcher,
    business: BusinessProfile,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn BookingStore>,
        payments: Arc<dyn PaymentGateway>,
        notifiers: Vec<Arc<dyn Notifier>>,
        dispatcher: Dispatcher,
        business: BusinessProfile,
    ) -> Self {
        Self {
            store,
            payments,
            notifiers,
            dispatcher,
            business,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run one submission. `Err` means no record was created, except
    /// `CoreError::SaveUnconfirmed`: the store accepted the write but its
    /// reply identified no record.
    pub async fn submit(
        &self,
        draft: ValidatedDraft,
        presenter: &dyn Presenter,
    ) -> Result<SubmissionOutcome, CoreError> {
        info!(service = %draft.service_type(), "submitting booking");

        let record = match self.store.create(&draft).await {
            Ok(record) => record,
            Err(e) => {
                let notice = if matches!(e, CoreError::SaveUnconfirmed { .. }) {
                    warn!(error = %e, "booking save not confirmed");
                    Notice::error(
                        "Booking not confirmed",
                        format!(
                            "{} Call {} or email {}.",
                            e.user_message(),
                            self.business.phone,
                            self.business.email,
                        ),
                    )
                } else {
                    warn!(error = %e, "booking not saved");
                    Notice::error("Booking failed", e.user_message())
                };
                presenter.toast(notice);
                return Err(e);
            }
        };

        match self.payments.create_session(&record).await {
            Ok(session) => {
                let spawned = self.dispatcher.dispatch(&record, &self.notifiers);
                info!(booking_id = %record.id, notifications = spawned, "redirecting to checkout");

                presenter.toast(Notice::success(
                    "Booking received",
                    format!(
                        "Reference {}. Continue to payment to confirm your appointment.",
                        record.reference()
                    ),
                ));
                presenter.redirect(&session.url);
                Ok(SubmissionOutcome::Redirected { record, session })
            }
            Err(error) => {
                warn!(booking_id = %record.id, error = %error, "payment session unavailable");
                presenter.toast(Notice::error(
                    "Payment unavailable",
                    format!(
                        "Your booking (reference {}) was saved but we could not start checkout. \
                         Call {} or email {} to complete payment.",
                        record.reference(),
                        self.business.phone,
                        self.business.email,
                    ),
                ));
                Ok(SubmissionOutcome::PaymentUnavailable { record, error })
            }
        }
    }
}
