#![allow(clippy::unwrap_used)]
// Integration tests for `RestClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notarydesk_api::rest::NewBookingRow;
use notarydesk_api::{Error, ProjectKeys, RestClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let keys = ProjectKeys::anonymous(SecretString::from("anon-key".to_string()));
    let client =
        RestClient::new(&server.uri(), &keys, &TransportConfig::default(), "bookings").unwrap();
    (server, client)
}

fn new_row() -> NewBookingRow {
    NewBookingRow {
        status: "pending".into(),
        name: "John Doe".into(),
        email: "john@example.com".into(),
        phone: "8144800989".into(),
        sms_opt_in: false,
        service_type: "ron".into(),
        location: None,
        document_count: 1,
        preferred_date: None,
        preferred_time: None,
        add_ons: Vec::new(),
        notes: None,
    }
}

fn stored_row(id: Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "status": status,
        "created_at": "2026-03-01T15:04:05Z",
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

// ── Insert ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_insert_booking_returns_representation() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({ "name": "John Doe", "status": "pending" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored_row(id, "pending")])))
        .expect(1)
        .mount(&server)
        .await;

    let row = client.insert_booking(&new_row()).await.unwrap();

    assert_eq!(row.id, id);
    assert_eq!(row.status, "pending");
    assert_eq!(row.service_type, "ron");
    assert_eq!(row.document_count, 1);
}

#[tokio::test]
async fn test_insert_with_empty_representation_is_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = client.insert_booking(&new_row()).await;

    assert!(
        matches!(result, Err(Error::EmptyResponse { ref resource }) if resource == "bookings"),
        "expected EmptyResponse, got: {result:?}"
    );
}

#[tokio::test]
async fn test_insert_rejected_by_policy() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "23502",
            "message": "null value in column \"email\" violates not-null constraint",
            "details": "Failing row contains (...)",
            "hint": null
        })))
        .mount(&server)
        .await;

    let result = client.insert_booking(&new_row()).await;

    match result {
        Err(Error::Api {
            status,
            ref message,
            ref code,
        }) => {
            assert_eq!(status, 400);
            assert!(message.contains("not-null"), "unexpected message: {message}");
            assert_eq!(code.as_deref(), Some("23502"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Select / update ─────────────────────────────────────────────────

#[tokio::test]
async fn test_get_booking_uses_eq_filter() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{id}")))
        .and(query_param("select", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_row(id, "confirmed")])))
        .mount(&server)
        .await;

    let row = client.get_booking(id).await.unwrap().unwrap();

    assert_eq!(row.id, id);
    assert_eq!(row.status, "confirmed");
}

#[tokio::test]
async fn test_get_missing_booking_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let row = client.get_booking(Uuid::new_v4()).await.unwrap();

    assert!(row.is_none());
}

#[tokio::test]
async fn test_update_status_patches_only_status() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{id}")))
        .and(body_partial_json(json!({ "status": "cancelled" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_row(id, "cancelled")])))
        .expect(1)
        .mount(&server)
        .await;

    let row = client
        .update_booking_status(id, "cancelled")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row.status, "cancelled");
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let result = client.get_booking(Uuid::new_v4()).await;

    match result {
        Err(Error::Unauthorized { ref message }) => {
            assert!(message.contains("Invalid API key"), "got: {message}");
        }
        other => panic!("expected Unauthorized, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let result = client.insert_booking(&new_row()).await;

    assert!(
        matches!(result, Err(Error::RateLimited { retry_after_secs: 12 })),
        "expected RateLimited, got: {result:?}"
    );
    assert!(result.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_malformed_body_keeps_raw_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = client.get_booking(Uuid::new_v4()).await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "<html>gateway</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
