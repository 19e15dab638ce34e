#![allow(clippy::unwrap_used)]
// `Desk` wired to the hosted clients, against a wiremock backend.

use std::sync::Mutex;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notarydesk_core::wizard::validate_all;
use notarydesk_core::{
    BackendConfig, BookingDraft, BookingStatus, CoreError, Desk, Notice, Presenter,
    SubmissionOutcome, ValidatedDraft,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Capture {
    toasts: Mutex<Vec<Notice>>,
    redirects: Mutex<Vec<Url>>,
}

impl Presenter for Capture {
    fn toast(&self, notice: Notice) {
        self.toasts.lock().unwrap().push(notice);
    }

    fn redirect(&self, url: &Url) {
        self.redirects.lock().unwrap().push(url.clone());
    }
}

fn config(server: &MockServer) -> BackendConfig {
    BackendConfig::new(
        server.uri().parse().unwrap(),
        SecretString::from("anon-key".to_string()),
    )
}

fn draft(sms_opt_in: bool) -> ValidatedDraft {
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

fn row(id: Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "status": status,
        "created_at": "2026-03-01T15:04:05+00:00",
        "name": "John Doe",
        "email": "john@example.com",
        "phone": "8144800989",
        "sms_opt_in": false,
        "service_type": "ron",
        "location": null,
        "document_count": 1,
        "preferred_date": null,
        "preferred_time": null,
        "add_ons": [],
        "notes": null
    })
}

async fn mount_insert(server: &MockServer, id: Uuid) {
    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .and(body_partial_json(json!({ "status": "pending", "service_type": "ron" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row(id, "pending")])))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_function(server: &MockServer, name: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/functions/v1/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(times)
        .mount(server)
        .await;
}

// ── Submission ──────────────────────────────────────────────────────

#[tokio::test]
async fn submission_hits_store_checkout_and_notifications() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    mount_insert(&server, id).await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/create-checkout-session"))
        .and(body_partial_json(json!({ "bookingId": id, "customerEmail": "john@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://checkout.example.com/c/pay/cs_test_1",
            "sessionId": "cs_test_1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_function(&server, "send-booking-email", 1).await;
    mount_function(&server, "sync-crm-contact", 1).await;
    mount_function(&server, "send-booking-sms", 0).await;

    let desk = Desk::new(config(&server)).unwrap();
    let presenter = Capture::default();

    let outcome = desk.submit(draft(false), &presenter).await.unwrap();
    desk.shutdown().await;

    let SubmissionOutcome::Redirected { record, session } = outcome else {
        panic!("expected redirect");
    };
    assert_eq!(record.id, id);
    assert_eq!(session.session_id.as_deref(), Some("cs_test_1"));
    assert_eq!(
        presenter.redirects.lock().unwrap().as_slice(),
        &[Url::parse("https://checkout.example.com/c/pay/cs_test_1").unwrap()]
    );
}

#[tokio::test]
async fn failed_insert_never_requests_payment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "23514",
            "message": "new row violates check constraint"
        })))
        .mount(&server)
        .await;
    mount_function(&server, "create-checkout-session", 0).await;
    mount_function(&server, "send-booking-email", 0).await;

    let desk = Desk::new(config(&server)).unwrap();
    let presenter = Capture::default();

    let err = desk.submit(draft(true), &presenter).await.unwrap_err();
    desk.shutdown().await;

    match err {
        CoreError::Persistence { ref message } => assert!(message.contains("check constraint")),
        other => panic!("expected Persistence, got: {other:?}"),
    }
    let toasts = presenter.toasts.lock().unwrap();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].is_error());
    assert!(presenter.redirects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn checkout_failure_keeps_pending_record_and_skips_notifications() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    mount_insert(&server, id).await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/create-checkout-session"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "error": "upstream" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_function(&server, "send-booking-email", 0).await;
    mount_function(&server, "sync-crm-contact", 0).await;

    let desk = Desk::new(config(&server)).unwrap();
    let presenter = Capture::default();

    let outcome = desk.submit(draft(false), &presenter).await.unwrap();
    desk.shutdown().await;

    match outcome {
        SubmissionOutcome::PaymentUnavailable { record, error } => {
            assert_eq!(record.status, BookingStatus::Pending);
            assert!(matches!(error, CoreError::Payment { .. }));
        }
        other => panic!("expected PaymentUnavailable, got: {other:?}"),
    }
    assert!(presenter.redirects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_stored_row_still_reaches_checkout() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    // `timestamp` column without a zone: the row no longer decodes.
    let mut stored = row(id, "pending");
    stored["created_at"] = json!("2026-03-01T15:04:05.123456");
    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/create-checkout-session"))
        .and(body_partial_json(json!({ "bookingId": id })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://checkout.example.com/c/pay/cs_test_4"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_function(&server, "send-booking-email", 1).await;
    mount_function(&server, "sync-crm-contact", 1).await;

    let desk = Desk::new(config(&server)).unwrap();
    let presenter = Capture::default();

    let outcome = desk.submit(draft(false), &presenter).await.unwrap();
    desk.shutdown().await;

    let record = outcome.record();
    assert_eq!(record.id, id);
    assert_eq!(record.status, BookingStatus::Pending);
    assert_eq!(record.email, "john@example.com");
    assert!(matches!(outcome, SubmissionOutcome::Redirected { .. }));

    let toasts = presenter.toasts.lock().unwrap();
    assert!(toasts.iter().all(|t| t.title != "Booking failed"));
    assert!(toasts.iter().all(|t| !t.message.contains("created_at")));
}

#[tokio::test]
async fn accepted_insert_without_row_is_unconfirmed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    mount_function(&server, "create-checkout-session", 0).await;
    mount_function(&server, "send-booking-email", 0).await;

    let desk = Desk::new(config(&server)).unwrap();
    let business = desk.config().business.clone();
    let presenter = Capture::default();

    let err = desk.submit(draft(false), &presenter).await.unwrap_err();
    desk.shutdown().await;

    assert!(matches!(err, CoreError::SaveUnconfirmed { .. }));
    let toasts = presenter.toasts.lock().unwrap();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Booking not confirmed");
    assert!(toasts[0].message.contains(&business.phone));
    assert!(!toasts[0].message.contains("Empty response"));
    assert!(presenter.redirects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sms_and_webhook_fire_when_configured() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    mount_insert(&server, id).await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/create-checkout-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://checkout.example.com/c/pay/cs_test_2"
        })))
        .mount(&server)
        .await;
    mount_function(&server, "send-booking-email", 1).await;
    mount_function(&server, "sync-crm-contact", 1).await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/send-booking-sms"))
        .and(body_partial_json(json!({ "to": "8144800989", "bookingId": id })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/hooks/new-booking"))
        .and(body_partial_json(json!({
            "event": "booking.created",
            "email": "john@example.com",
            "businessPhone": "(814) 480-0989"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.automation_webhook = Some(Url::parse(&format!("{}/hooks/new-booking", server.uri())).unwrap());
    let desk = Desk::new(config).unwrap();

    let outcome = desk.submit(draft(true), &Capture::default()).await.unwrap();
    desk.shutdown().await;

    assert!(matches!(outcome, SubmissionOutcome::Redirected { .. }));
}

#[tokio::test]
async fn failing_notifications_are_swallowed() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    mount_insert(&server, id).await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/create-checkout-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://checkout.example.com/c/pay/cs_test_3"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/functions/v1/send-booking-email"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "smtp down" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/functions/v1/sync-crm-contact"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let desk = Desk::new(config(&server)).unwrap();
    let presenter = Capture::default();

    let outcome = desk.submit(draft(false), &presenter).await.unwrap();
    desk.shutdown().await;

    assert!(matches!(outcome, SubmissionOutcome::Redirected { .. }));
    assert!(presenter.toasts.lock().unwrap().iter().all(|t| !t.is_error()));
}

// ── Admin operations ────────────────────────────────────────────────

#[tokio::test]
async fn set_status_uses_admin_key() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{id}")))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer admin-key"))
        .and(body_partial_json(json!({ "status": "confirmed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(id, "confirmed")])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.admin_key = Some(SecretString::from("admin-key".to_string()));
    let desk = Desk::new(config).unwrap();

    let record = desk.set_status(id, BookingStatus::Confirmed).await.unwrap();

    assert_eq!(record.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn unknown_booking_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let desk = Desk::new(config(&server)).unwrap();
    let id = Uuid::new_v4();

    assert!(matches!(
        desk.get_booking(id).await,
        Err(CoreError::BookingNotFound { .. })
    ));
    assert!(matches!(
        desk.set_status(id, BookingStatus::Cancelled).await,
        Err(CoreError::BookingNotFound { .. })
    ));
}

#[tokio::test]
async fn rejected_key_maps_to_authentication_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid API key" })))
        .mount(&server)
        .await;

    let desk = Desk::new(config(&server)).unwrap();
    let result = desk.get_booking(Uuid::new_v4()).await;

    assert!(matches!(result, Err(CoreError::AuthenticationFailed { .. })));
}
