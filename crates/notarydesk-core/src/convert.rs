// ── API-to-domain conversions ──
//
// Bridges `notarydesk_api` wire types and `notarydesk_core::model`.
// Rows coming back from the store are parsed strictly for the columns the
// flow depends on (status, service) and leniently for the rest.

use std::str::FromStr;

use chrono::{NaiveTime, Utc};
use notarydesk_api::functions::{BookingSummary, CheckoutSession};
use notarydesk_api::rest::{BookingRow, NewBookingRow};
use tracing::warn;
use url::Url;
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{AddOn, BookingRecord, BookingStatus, PaymentSession, ServiceType};
use crate::wizard::ValidatedDraft;

// ── Helpers ────────────────────────────────────────────────────────

/// Accept both `HH:MM` (what we write) and `HH:MM:SS` (what `time`
/// columns render).
fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

// ── Booking rows ───────────────────────────────────────────────────

impl From<&ValidatedDraft> for NewBookingRow {
    fn from(draft: &ValidatedDraft) -> Self {
        Self {
            status: BookingStatus::Pending.as_str().to_owned(),
            name: draft.name().to_owned(),
            email: draft.email().to_owned(),
            phone: draft.phone().to_owned(),
            sms_opt_in: draft.sms_opt_in(),
            service_type: draft.service_type().key().to_owned(),
            location: draft.location().map(str::to_owned),
            document_count: draft.document_count(),
            preferred_date: draft.preferred_date(),
            preferred_time: draft.preferred_time().map(|t| t.format("%H:%M").to_string()),
            add_ons: draft.add_ons().iter().map(|a| a.key().to_owned()).collect(),
            notes: draft.notes().map(str::to_owned),
        }
    }
}

impl TryFrom<BookingRow> for BookingRecord {
    type Error = CoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::from_str(&row.status).map_err(|_| {
            CoreError::Internal(format!("booking {} has unknown status '{}'", row.id, row.status))
        })?;
        let service_type = ServiceType::from_str(&row.service_type).map_err(|_| {
            CoreError::Internal(format!(
                "booking {} has unknown service '{}'",
                row.id, row.service_type
            ))
        })?;

        let add_ons = row
            .add_ons
            .iter()
            .filter_map(|key| match AddOn::from_str(key) {
                Ok(add_on) => Some(add_on),
                Err(_) => {
                    warn!(booking_id = %row.id, add_on = %key, "dropping unknown add-on");
                    None
                }
            })
            .collect();

        Ok(Self {
            id: row.id,
            status,
            created_at: row.created_at,
            name: row.name,
            email: row.email,
            phone: row.phone,
            sms_opt_in: row.sms_opt_in,
            service_type,
            location: row.location.filter(|l| !l.is_empty()),
            document_count: row.document_count.max(1),
            preferred_date: row.preferred_date,
            preferred_time: row.preferred_time.as_deref().and_then(parse_time),
            add_ons,
            notes: row.notes.filter(|n| !n.is_empty()),
        })
    }
}

impl BookingRecord {
    /// The record an accepted insert of `draft` stands for, used when the
    /// store's reply names the new id but cannot be read as a row.
    pub(crate) fn from_inserted(id: Uuid, draft: &ValidatedDraft) -> Self {
        Self {
            id,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            name: draft.name().to_owned(),
            email: draft.email().to_owned(),
            phone: draft.phone().to_owned(),
            sms_opt_in: draft.sms_opt_in(),
            service_type: draft.service_type(),
            location: draft.location().map(str::to_owned),
            document_count: draft.document_count(),
            preferred_date: draft.preferred_date(),
            preferred_time: draft.preferred_time(),
            add_ons: draft.add_ons().to_vec(),
            notes: draft.notes().map(str::to_owned),
        }
    }
}

// ── Hosted functions ───────────────────────────────────────────────

impl From<&BookingRecord> for BookingSummary {
    fn from(record: &BookingRecord) -> Self {
        Self {
            booking_id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            service_type: record.service_type.key().to_owned(),
            service_label: record.service_type.label().to_owned(),
            preferred_date: record.preferred_date,
            preferred_time: record.preferred_time.map(|t| t.format("%H:%M").to_string()),
            location: record.location.clone(),
            document_count: record.document_count,
            add_ons: record.add_ons.iter().map(|a| a.key().to_owned()).collect(),
        }
    }
}

impl TryFrom<CheckoutSession> for PaymentSession {
    type Error = CoreError;

    fn try_from(session: CheckoutSession) -> Result<Self, Self::Error> {
        let url = Url::parse(&session.url).map_err(|e| CoreError::Payment {
            message: format!("checkout URL '{}' is invalid: {e}", session.url),
        })?;
        Ok(Self {
            url,
            session_id: session.session_id,
        })
    }
}
