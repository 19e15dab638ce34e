// Wire types for the `bookings` table.
//
// Column names are snake_case, matching the table definition. Times are
// kept as strings at this layer: the database renders `time` columns as
// `HH:MM:SS`, and core owns the parsing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row read back from the bookings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub sms_opt_in: bool,
    pub service_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_document_count")]
    pub document_count: u32,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub add_ons: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_document_count() -> u32 {
    1
}

/// Insert payload. `id` and `created_at` are assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBookingRow {
    pub status: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub sms_opt_in: bool,
    pub service_type: String,
    pub location: Option<String>,
    pub document_count: u32,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub add_ons: Vec<String>,
    pub notes: Option<String>,
}

/// Partial update that only touches `status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusPatch<'a> {
    pub status: &'a str,
}
