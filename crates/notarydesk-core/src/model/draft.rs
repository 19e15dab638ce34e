// ── Booking draft ──
//
// The transient, client-held record the wizard edits. Every user-typed
// value stays a raw string here; the validator decides acceptance and
// produces typed values. Nothing in this type is ever persisted.

use serde::{Deserialize, Deserializer, Serialize};

use crate::wizard::FieldId;

/// Field values accumulated across wizard steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub sms_opt_in: bool,
    #[serde(alias = "service")]
    pub service_type: String,
    pub location: String,
    #[serde(deserialize_with = "string_or_number")]
    pub document_count: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub add_ons: Vec<String>,
    pub notes: String,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a text-like field. `None` for flags and multi-choice.
    pub fn text(&self, field: FieldId) -> Option<&str> {
        let value = match field {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Phone => &self.phone,
            FieldId::ServiceType => &self.service_type,
            FieldId::Location => &self.location,
            FieldId::DocumentCount => &self.document_count,
            FieldId::PreferredDate => &self.preferred_date,
            FieldId::PreferredTime => &self.preferred_time,
            FieldId::Notes => &self.notes,
            FieldId::SmsOptIn | FieldId::AddOns => return None,
        };
        Some(value)
    }

    pub(crate) fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
        let value = match field {
            FieldId::Name => &mut self.name,
            FieldId::Email => &mut self.email,
            FieldId::Phone => &mut self.phone,
            FieldId::ServiceType => &mut self.service_type,
            FieldId::Location => &mut self.location,
            FieldId::DocumentCount => &mut self.document_count,
            FieldId::PreferredDate => &mut self.preferred_date,
            FieldId::PreferredTime => &mut self.preferred_time,
            FieldId::Notes => &mut self.notes,
            FieldId::SmsOptIn | FieldId::AddOns => return None,
        };
        Some(value)
    }
}

/// Draft files may write counts as JSON numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
