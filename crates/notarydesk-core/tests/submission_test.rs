#![allow(clippy::unwrap_used)]
// Submission flow against in-memory collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use url::Url;
use uuid::Uuid;

use notarydesk_core::wizard::validate_all;
use notarydesk_core::{
    BackendConfig, BookingDraft, BookingRecord, BookingStatus, BookingStore, CoreError, Desk,
    Notice, NoticeLevel, Notifier, PaymentGateway, PaymentSession, Presenter, SubmissionOutcome,
    ValidatedDraft,
};

// ── Doubles ─────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryStore {
    fail: bool,
    records: Mutex<Vec<BookingRecord>>,
}

impl MemoryStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn create(&self, draft: &ValidatedDraft) -> Result<BookingRecord, CoreError> {
        if self.fail {
            return Err(CoreError::Persistence {
                message: "insert rejected".into(),
            });
        }
        let record = BookingRecord {
            id: Uuid::new_v4(),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            name: draft.name().into(),
            email: draft.email().into(),
            phone: draft.phone().into(),
            sms_opt_in: draft.sms_opt_in(),
            service_type: draft.service_type(),
            location: draft.location().map(Into::into),
            document_count: draft.document_count(),
            preferred_date: draft.preferred_date(),
            preferred_time: draft.preferred_time(),
            add_ons: draft.add_ons().to_vec(),
            notes: draft.notes().map(Into::into),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<BookingRecord, CoreError> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(CoreError::BookingNotFound { id: id.to_string() })
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<BookingRecord, CoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(CoreError::BookingNotFound { id: id.to_string() })?;
        record.status = status;
        Ok(record.clone())
    }
}

#[derive(Default)]
struct FakeCheckout {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl PaymentGateway for FakeCheckout {
    async fn create_session(&self, record: &BookingRecord) -> Result<PaymentSession, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::Payment {
                message: "provider down".into(),
            });
        }
        Ok(PaymentSession {
            url: Url::parse(&format!("https://checkout.example.com/pay/{}", record.id)).unwrap(),
            session_id: Some("cs_test".into()),
        })
    }
}

struct CountingNotifier {
    channel: &'static str,
    sms_only_on_opt_in: bool,
    fail: bool,
    sent: AtomicUsize,
}

impl CountingNotifier {
    fn new(channel: &'static str) -> Self {
        Self {
            channel,
            sms_only_on_opt_in: false,
            fail: false,
            sent: AtomicUsize::new(0),
        }
    }

    fn sms() -> Self {
        Self {
            sms_only_on_opt_in: true,
            ..Self::new("sms")
        }
    }

    fn failing(channel: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(channel)
        }
    }

    fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for CountingNotifier {
    fn channel(&self) -> &'static str {
        self.channel
    }

    fn applies_to(&self, record: &BookingRecord) -> bool {
        !self.sms_only_on_opt_in || record.sms_opt_in
    }

    async fn notify(&self, _record: &BookingRecord) -> Result<(), CoreError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::Notification {
                channel: self.channel,
                message: "boom".into(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingPresenter {
    toasts: Mutex<Vec<Notice>>,
    redirects: Mutex<Vec<Url>>,
}

impl Presenter for RecordingPresenter {
    fn toast(&self, notice: Notice) {
        self.toasts.lock().unwrap().push(notice);
    }

    fn redirect(&self, url: &Url) {
        self.redirects.lock().unwrap().push(url.clone());
    }
}

impl RecordingPresenter {
    fn levels(&self) -> Vec<NoticeLevel> {
        self.toasts.lock().unwrap().iter().map(|n| n.level).collect()
    }

    fn redirect_count(&self) -> usize {
        self.redirects.lock().unwrap().len()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    store: Arc<MemoryStore>,
    checkout: Arc<FakeCheckout>,
    email: Arc<CountingNotifier>,
    sms: Arc<CountingNotifier>,
    crm: Arc<CountingNotifier>,
    desk: Desk,
}

fn harness(store: MemoryStore, checkout: FakeCheckout, crm: CountingNotifier) -> Harness {
    let store = Arc::new(store);
    let checkout = Arc::new(checkout);
    let email = Arc::new(CountingNotifier::new("email"));
    let sms = Arc::new(CountingNotifier::sms());
    let crm = Arc::new(crm);

    let config = BackendConfig::new(
        "https://project.example.co".parse().unwrap(),
        SecretString::from("anon".to_string()),
    );
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();
    notifiers.push(email.clone());
    notifiers.push(sms.clone());
    notifiers.push(crm.clone());
    let desk = Desk::from_parts(config, store.clone(), checkout.clone(), notifiers);

    Harness {
        store,
        checkout,
        email,
        sms,
        crm,
        desk,
    }
}

fn john(sms_opt_in: bool) -> ValidatedDraft {
    validate_all(&BookingDraft {
        name: "John Doe".into(),
        email: "john@example.com".into(),
        phone: "8144800989".into(),
        service_type: "ron".into(),
        sms_opt_in,
        ..BookingDraft::default()
    })
    .unwrap()
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn happy_path_inserts_once_requests_payment_once_redirects_once() {
    let h = harness(
        MemoryStore::default(),
        FakeCheckout::default(),
        CountingNotifier::new("crm"),
    );
    let presenter = RecordingPresenter::default();

    let outcome = h.desk.submit(john(false), &presenter).await.unwrap();

    let SubmissionOutcome::Redirected { record, session } = outcome else {
        panic!("expected redirect");
    };
    assert_eq!(record.status, BookingStatus::Pending);
    assert_eq!(session.url.path(), format!("/pay/{}", record.id));
    assert_eq!(h.store.count(), 1);
    assert_eq!(h.checkout.calls.load(Ordering::SeqCst), 1);
    assert_eq!(presenter.redirect_count(), 1);
    assert_eq!(presenter.levels(), vec![NoticeLevel::Success]);

    h.desk.shutdown().await;
    assert_eq!(h.email.sent(), 1);
    assert_eq!(h.crm.sent(), 1);
    assert_eq!(h.sms.sent(), 0, "no SMS without opt-in");
}

#[tokio::test]
async fn persistence_failure_stops_before_payment() {
    let h = harness(
        MemoryStore::failing(),
        FakeCheckout::default(),
        CountingNotifier::new("crm"),
    );
    let presenter = RecordingPresenter::default();

    let err = h.desk.submit(john(true), &presenter).await.unwrap_err();

    assert!(matches!(err, CoreError::Persistence { .. }));
    assert_eq!(h.store.count(), 0);
    assert_eq!(h.checkout.calls.load(Ordering::SeqCst), 0);
    assert_eq!(presenter.redirect_count(), 0);
    assert_eq!(presenter.levels(), vec![NoticeLevel::Error]);

    h.desk.shutdown().await;
    assert_eq!(h.email.sent() + h.sms.sent() + h.crm.sent(), 0);
}

#[tokio::test]
async fn payment_failure_leaves_record_pending() {
    let h = harness(
        MemoryStore::default(),
        FakeCheckout {
            fail: true,
            ..FakeCheckout::default()
        },
        CountingNotifier::new("crm"),
    );
    let presenter = RecordingPresenter::default();

    let outcome = h.desk.submit(john(false), &presenter).await.unwrap();

    let SubmissionOutcome::PaymentUnavailable { record, error } = outcome else {
        panic!("expected payment failure");
    };
    assert!(matches!(error, CoreError::Payment { .. }));
    assert_eq!(presenter.redirect_count(), 0);
    assert_eq!(presenter.levels(), vec![NoticeLevel::Error]);

    let stored = h.desk.get_booking(record.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);

    let toast = presenter.toasts.lock().unwrap()[0].clone();
    assert!(toast.message.contains(&record.reference()));
}

#[tokio::test]
async fn sms_is_sent_only_with_opt_in() {
    let h = harness(
        MemoryStore::default(),
        FakeCheckout::default(),
        CountingNotifier::new("crm"),
    );
    let presenter = RecordingPresenter::default();

    h.desk.submit(john(true), &presenter).await.unwrap();
    h.desk.shutdown().await;

    assert_eq!(h.sms.sent(), 1);
    assert_eq!(h.email.sent(), 1);
}

#[tokio::test]
async fn notification_failure_does_not_change_outcome() {
    let h = harness(
        MemoryStore::default(),
        FakeCheckout::default(),
        CountingNotifier::failing("crm"),
    );
    let presenter = RecordingPresenter::default();

    let outcome = h.desk.submit(john(false), &presenter).await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Redirected { .. }));
    assert_eq!(presenter.levels(), vec![NoticeLevel::Success]);

    h.desk.shutdown().await;
    assert_eq!(h.crm.sent(), 1);
    assert_eq!(h.email.sent(), 1);
}

#[tokio::test]
async fn status_transitions_are_direct_writes() {
    let h = harness(
        MemoryStore::default(),
        FakeCheckout::default(),
        CountingNotifier::new("crm"),
    );
    let presenter = RecordingPresenter::default();
    let outcome = h.desk.submit(john(false), &presenter).await.unwrap();
    let id = outcome.record().id;

    // Any order is accepted, including leaving a terminal state.
    for status in [
        BookingStatus::Cancelled,
        BookingStatus::Completed,
        BookingStatus::Pending,
        BookingStatus::Confirmed,
    ] {
        let updated = h.desk.set_status(id, status).await.unwrap();
        assert_eq!(updated.status, status);
    }

    let missing = h.desk.set_status(Uuid::new_v4(), BookingStatus::Confirmed).await;
    assert!(matches!(missing, Err(CoreError::BookingNotFound { .. })));
}
