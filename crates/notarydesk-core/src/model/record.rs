// ── Persisted booking ──

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use super::service::{AddOn, ServiceType};

/// Lifecycle status of a stored booking.
///
/// New records are `Pending`. Later transitions (confirmed, completed,
/// cancelled) are plain writes triggered by an admin or a webhook; no
/// transition is refused.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A booking as stored by the hosted data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub sms_opt_in: bool,
    pub service_type: ServiceType,
    pub location: Option<String>,
    pub document_count: u32,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<NaiveTime>,
    pub add_ons: Vec<AddOn>,
    pub notes: Option<String>,
}

impl BookingRecord {
    /// First eight characters of the id, used as a customer-facing reference.
    pub fn reference(&self) -> String {
        self.id.simple().to_string()[..8].to_uppercase()
    }
}
