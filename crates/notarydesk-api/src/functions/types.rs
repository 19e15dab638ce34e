// Request/response bodies for hosted functions (camelCase on the wire).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body for the checkout-session function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub booking_id: Uuid,
    pub service_type: String,
    pub add_ons: Vec<String>,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

/// The checkout function's answer: where to send the customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub url: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Booking fields repeated in every notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub booking_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub service_label: String,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub location: Option<String>,
    pub document_count: u32,
    pub add_ons: Vec<String>,
}

/// Body for the confirmation-email function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub to: String,
    pub template: String,
    pub reply_to: String,
    pub booking: BookingSummary,
}

/// Body for the SMS function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsRequest {
    pub to: String,
    pub message: String,
    pub booking_id: Uuid,
}

/// Body for the CRM contact-sync function and automation webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub source: String,
    pub tags: Vec<String>,
    pub booking: BookingSummary,
}
