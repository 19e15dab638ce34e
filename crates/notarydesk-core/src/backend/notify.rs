// Best-effort notification channels.
//
// Each channel is independent: the dispatcher spawns one task per channel
// and only logs failures.

use std::sync::Arc;

use async_trait::async_trait;
use notarydesk_api::functions::{BookingSummary, CrmContact, EmailRequest, SmsRequest};
use notarydesk_api::{FunctionsClient, WebhookClient};
use serde::Serialize;

use super::Notifier;
use crate::config::BusinessProfile;
use crate::error::CoreError;
use crate::model::BookingRecord;

const CONFIRMATION_TEMPLATE: &str = "booking-confirmation";
const CRM_SOURCE: &str = "booking-wizard";

fn failed(channel: &'static str) -> impl FnOnce(notarydesk_api::Error) -> CoreError {
    move |err| CoreError::Notification {
        channel,
        message: err.to_string(),
    }
}

// ── Email ───────────────────────────────────────────────────────────

pub struct EmailNotifier {
    functions: Arc<FunctionsClient>,
    business: BusinessProfile,
}

impl EmailNotifier {
    pub fn new(functions: Arc<FunctionsClient>, business: BusinessProfile) -> Self {
        Self {
            functions,
            business,
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }

    async fn notify(&self, record: &BookingRecord) -> Result<(), CoreError> {
        let request = EmailRequest {
            to: record.email.clone(),
            template: CONFIRMATION_TEMPLATE.into(),
            reply_to: self.business.email.clone(),
            booking: BookingSummary::from(record),
        };
        self.functions
            .send_email(&request)
            .await
            .map_err(failed(self.channel()))
    }
}

// ── SMS ─────────────────────────────────────────────────────────────

pub struct SmsNotifier {
    functions: Arc<FunctionsClient>,
    business: BusinessProfile,
}

impl SmsNotifier {
    pub fn new(functions: Arc<FunctionsClient>, business: BusinessProfile) -> Self {
        Self {
            functions,
            business,
        }
    }

    fn message(&self, record: &BookingRecord) -> String {
        format!(
            "{}: we received your {} booking (ref {}). Questions? Call {}.",
            self.business.name,
            record.service_type.label(),
            record.reference(),
            self.business.phone,
        )
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn channel(&self) -> &'static str {
        "sms"
    }

    /// Texts go out only with consent.
    fn applies_to(&self, record: &BookingRecord) -> bool {
        record.sms_opt_in
    }

    async fn notify(&self, record: &BookingRecord) -> Result<(), CoreError> {
        let request = SmsRequest {
            to: record.phone.clone(),
            message: self.message(record),
            booking_id: record.id,
        };
        self.functions
            .send_sms(&request)
            .await
            .map_err(failed(self.channel()))
    }
}

// ── CRM ─────────────────────────────────────────────────────────────

fn crm_contact(record: &BookingRecord) -> CrmContact {
    let mut tags = vec![record.service_type.key().to_owned()];
    tags.extend(record.add_ons.iter().map(|a| a.key().to_owned()));

    CrmContact {
        name: record.name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        source: CRM_SOURCE.into(),
        tags,
        booking: BookingSummary::from(record),
    }
}

pub struct CrmNotifier {
    functions: Arc<FunctionsClient>,
}

impl CrmNotifier {
    pub fn new(functions: Arc<FunctionsClient>) -> Self {
        Self { functions }
    }
}

#[async_trait]
impl Notifier for CrmNotifier {
    fn channel(&self) -> &'static str {
        "crm"
    }

    async fn notify(&self, record: &BookingRecord) -> Result<(), CoreError> {
        self.functions
            .sync_crm_contact(&crm_contact(record))
            .await
            .map_err(failed(self.channel()))
    }
}

// ── Automation webhook ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEvent<'a> {
    event: &'static str,
    business_phone: &'a str,
    business_email: &'a str,
    #[serde(flatten)]
    contact: CrmContact,
}

pub struct WebhookNotifier {
    client: WebhookClient,
    business: BusinessProfile,
}

impl WebhookNotifier {
    pub fn new(client: WebhookClient, business: BusinessProfile) -> Self {
        Self { client, business }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn channel(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, record: &BookingRecord) -> Result<(), CoreError> {
        let event = WebhookEvent {
            event: "booking.created",
            business_phone: &self.business.phone,
            business_email: &self.business.email,
            contact: crm_contact(record),
        };
        self.client
            .post(&event)
            .await
            .map_err(failed(self.channel()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use notarydesk_api::{FunctionNames, ProjectKeys, TransportConfig};
    use secrecy::SecretString;
    use uuid::Uuid;

    use super::*;
    use crate::model::{AddOn, BookingStatus, ServiceType};

    fn record() -> BookingRecord {
        BookingRecord {
            id: Uuid::parse_str("6f1c2a9e-0b7d-4c1e-9a53-2f8e4d7b1c00").unwrap(),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "8144800989".into(),
            sms_opt_in: false,
            service_type: ServiceType::Apostille,
            location: None,
            document_count: 1,
            preferred_date: None,
            preferred_time: None,
            add_ons: vec![AddOn::RushService],
            notes: None,
        }
    }

    #[test]
    fn crm_tags_include_service_and_add_ons() {
        let contact = crm_contact(&record());
        assert_eq!(contact.tags, vec!["apostille", "rush_service"]);
        assert_eq!(contact.source, "booking-wizard");
    }

    #[test]
    fn sms_text_names_business_and_reference() {
        let keys = ProjectKeys::anonymous(SecretString::from("anon".to_string()));
        let functions = FunctionsClient::new(
            "http://localhost:54321",
            &keys,
            &TransportConfig::default(),
            FunctionNames::default(),
        )
        .unwrap();
        let sms = SmsNotifier::new(Arc::new(functions), BusinessProfile::default());

        assert_eq!(
            sms.message(&record()),
            "Notary Services: we received your Apostille Services booking (ref 6F1C2A9E). \
             Questions? Call (814) 480-0989."
        );
        assert!(!sms.applies_to(&record()));
    }
}
