// ── Step validator ──
//
// Pure functions over a `BookingDraft`: no clock, no I/O, same input gives
// the same answer. `validate_all` is the only way to obtain a
// `ValidatedDraft`, which in turn is the only thing the orchestrator
// accepts.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::fields::{Catalog, FieldId, FieldKind, FieldSpec, Requirement, STEPS, StepId};
use crate::model::{AddOn, BookingDraft, ServiceType};

/// Minimum number of digits a phone number must contain.
pub const MIN_PHONE_DIGITS: usize = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FieldId,
    pub message: String,
}

/// Field-level failures of one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn single(field: FieldId, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: FieldId, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for one field, if it failed.
    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn extend(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field.label(), error.message)?;
        }
        Ok(())
    }
}

// ── Validated draft ─────────────────────────────────────────────────

/// A draft that passed every step, with typed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedDraft {
    name: String,
    email: String,
    phone: String,
    sms_opt_in: bool,
    service_type: ServiceType,
    location: Option<String>,
    document_count: u32,
    preferred_date: Option<NaiveDate>,
    preferred_time: Option<NaiveTime>,
    add_ons: Vec<AddOn>,
    notes: Option<String>,
}

impl ValidatedDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn sms_opt_in(&self) -> bool {
        self.sms_opt_in
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn document_count(&self) -> u32 {
        self.document_count
    }

    pub fn preferred_date(&self) -> Option<NaiveDate> {
        self.preferred_date
    }

    pub fn preferred_time(&self) -> Option<NaiveTime> {
        self.preferred_time
    }

    /// Selected add-ons, deduplicated and in catalog order.
    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

// ── Shape checks ────────────────────────────────────────────────────

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
pub fn is_valid_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Digits plus common separators, with at least [`MIN_PHONE_DIGITS`] digits.
pub fn is_valid_phone(raw: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');
    raw.chars().all(allowed) && raw.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

fn parse_count(raw: &str) -> Result<u32, String> {
    // `u32::from_str` accepts a leading `+`; only bare digits are stored.
    let digits_only = raw.bytes().all(|b| b.is_ascii_digit());
    match raw.parse::<u32>() {
        Ok(n) if digits_only && n >= 1 => Ok(n),
        _ => Err("must be a whole number of at least 1".into()),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| "use the YYYY-MM-DD format".into())
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT).map_err(|_| "use the 24-hour HH:MM format".into())
}

fn parse_service(raw: &str) -> Result<ServiceType, String> {
    ServiceType::from_str(raw).map_err(|_| choice_message(Catalog::Services))
}

fn choice_message(catalog: Catalog) -> String {
    let keys: Vec<&str> = catalog.options().iter().map(|o| o.key).collect();
    format!("choose one of: {}", keys.join(", "))
}

fn in_person(draft: &BookingDraft) -> bool {
    ServiceType::from_str(draft.service_type.trim()).is_ok_and(ServiceType::is_in_person)
}

// ── Validation ──────────────────────────────────────────────────────

/// Check one field against its spec.
pub fn validate_field(spec: &FieldSpec, draft: &BookingDraft) -> Result<(), String> {
    let required = match spec.rule {
        Requirement::Required => true,
        Requirement::Optional => false,
        Requirement::RequiredWhenInPerson => in_person(draft),
    };

    match spec.kind {
        FieldKind::Flag => Ok(()),
        FieldKind::MultiChoice(catalog) => {
            if required && draft.add_ons.is_empty() {
                return Err("choose at least one option".into());
            }
            match draft.add_ons.iter().find(|key| !catalog.contains(key.trim())) {
                Some(unknown) => Err(format!("unknown option '{unknown}'")),
                None => Ok(()),
            }
        }
        kind => {
            let raw = draft.text(spec.id).unwrap_or_default().trim();
            if raw.is_empty() {
                return if required {
                    Err("is required".into())
                } else {
                    Ok(())
                };
            }
            match kind {
                FieldKind::Email if !is_valid_email(raw) => {
                    Err("enter a valid email address".into())
                }
                FieldKind::Phone if !is_valid_phone(raw) => Err(format!(
                    "enter a phone number with at least {MIN_PHONE_DIGITS} digits"
                )),
                FieldKind::Choice(catalog) if !catalog.contains(raw) => {
                    Err(choice_message(catalog))
                }
                FieldKind::Count => parse_count(raw).map(|_| ()),
                FieldKind::Date => parse_date(raw).map(|_| ()),
                FieldKind::Time => parse_time(raw).map(|_| ()),
                _ => Ok(()),
            }
        }
    }
}

/// Validate the fields of one step.
pub fn validate_step(step: StepId, draft: &BookingDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for spec in step.spec().fields {
        if let Err(message) = validate_field(spec, draft) {
            errors.push(spec.id, message);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate every step and convert the draft into typed values.
pub fn validate_all(draft: &BookingDraft) -> Result<ValidatedDraft, FieldErrors> {
    let mut errors = FieldErrors::default();
    for step in &STEPS {
        if let Err(step_errors) = validate_step(step.id, draft) {
            errors.extend(step_errors);
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let service_type = parse_service(draft.service_type.trim())
        .map_err(|m| FieldErrors::single(FieldId::ServiceType, m))?;
    let document_count = non_empty(&draft.document_count)
        .map(parse_count)
        .transpose()
        .map_err(|m| FieldErrors::single(FieldId::DocumentCount, m))?
        .unwrap_or(1);
    let preferred_date = non_empty(&draft.preferred_date)
        .map(parse_date)
        .transpose()
        .map_err(|m| FieldErrors::single(FieldId::PreferredDate, m))?;
    let preferred_time = non_empty(&draft.preferred_time)
        .map(parse_time)
        .transpose()
        .map_err(|m| FieldErrors::single(FieldId::PreferredTime, m))?;

    let mut add_ons: Vec<AddOn> = draft
        .add_ons
        .iter()
        .filter_map(|key| AddOn::from_str(key.trim()).ok())
        .collect();
    add_ons.sort_unstable();
    add_ons.dedup();

    Ok(ValidatedDraft {
        name: draft.name.trim().to_owned(),
        email: draft.email.trim().to_owned(),
        phone: draft.phone.trim().to_owned(),
        sms_opt_in: draft.sms_opt_in,
        service_type,
        location: non_empty(&draft.location).map(str::to_owned),
        document_count,
        preferred_date,
        preferred_time,
        add_ons,
        notes: non_empty(&draft.notes).map(str::to_owned),
    })
}

fn non_empty(raw: &str) -> Option<&str> {
    Some(raw.trim()).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn contact() -> BookingDraft {
        BookingDraft {
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "8144800989".into(),
            ..BookingDraft::default()
        }
    }

    fn complete() -> BookingDraft {
        BookingDraft {
            service_type: "ron".into(),
            ..contact()
        }
    }

    #[test]
    fn email_shapes() {
        for good in ["john@example.com", "a.b+c@mail.example.org", "x@y.io"] {
            assert!(is_valid_email(good), "{good} should pass");
        }
        for bad in [
            "john",
            "john.example.com",
            "john@",
            "@example.com",
            "john@example",
            "john@.com",
            "john@example.",
            "john doe@example.com",
            "a@b@c.com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should fail");
        }
    }

    #[test]
    fn phone_needs_ten_digits() {
        assert!(is_valid_phone("8144800989"));
        assert!(is_valid_phone("(814) 480-0989"));
        assert!(is_valid_phone("+1 814.480.0989"));
        assert!(!is_valid_phone("480-0989"));
        assert!(!is_valid_phone("814480098"));
        assert!(!is_valid_phone("814-480-CALL"));
    }

    #[test]
    fn empty_contact_step_reports_every_required_field() {
        let errors = validate_step(StepId::Contact, &BookingDraft::default()).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(FieldId::Name), Some("is required"));
        assert_eq!(errors.get(FieldId::Email), Some("is required"));
        assert_eq!(errors.get(FieldId::Phone), Some("is required"));
        assert_eq!(errors.get(FieldId::SmsOptIn), None);
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let draft = BookingDraft {
            name: "   ".into(),
            ..contact()
        };
        let errors = validate_step(StepId::Contact, &draft).unwrap_err();
        assert_eq!(errors.get(FieldId::Name), Some("is required"));
    }

    #[test]
    fn address_required_only_for_in_person_services() {
        let remote = complete();
        assert!(validate_step(StepId::Service, &remote).is_ok());

        let mobile = BookingDraft {
            service_type: "mobile_notary".into(),
            ..contact()
        };
        let errors = validate_step(StepId::Service, &mobile).unwrap_err();
        assert_eq!(errors.get(FieldId::Location), Some("is required"));

        let with_address = BookingDraft {
            location: "12 Main St, Erie PA".into(),
            ..mobile
        };
        assert!(validate_step(StepId::Service, &with_address).is_ok());
    }

    #[test]
    fn service_formats_are_checked() {
        let draft = BookingDraft {
            service_type: "wedding".into(),
            document_count: "0".into(),
            preferred_date: "03/14/2026".into(),
            preferred_time: "2pm".into(),
            ..contact()
        };
        let errors = validate_step(StepId::Service, &draft).unwrap_err();

        assert!(errors.get(FieldId::ServiceType).unwrap().starts_with("choose one of: ron"));
        assert_eq!(
            errors.get(FieldId::DocumentCount),
            Some("must be a whole number of at least 1")
        );
        assert_eq!(errors.get(FieldId::PreferredDate), Some("use the YYYY-MM-DD format"));
        assert_eq!(errors.get(FieldId::PreferredTime), Some("use the 24-hour HH:MM format"));
    }

    #[test]
    fn unknown_add_on_is_rejected() {
        let draft = BookingDraft {
            add_ons: vec!["rush_service".into(), "gift_wrap".into()],
            ..complete()
        };
        let errors = validate_step(StepId::Payment, &draft).unwrap_err();
        assert_eq!(errors.get(FieldId::AddOns), Some("unknown option 'gift_wrap'"));
    }

    #[test]
    fn validation_is_idempotent() {
        let draft = BookingDraft {
            email: "nope".into(),
            ..BookingDraft::default()
        };
        let first = validate_all(&draft);
        let second = validate_all(&draft);
        assert_eq!(first, second);
        assert_eq!(validate_all(&complete()), validate_all(&complete()));
    }

    #[test]
    fn validate_all_produces_typed_values() {
        let draft = BookingDraft {
            name: "  John Doe ".into(),
            service_type: "loan_signing".into(),
            location: "12 Main St".into(),
            document_count: "4".into(),
            preferred_date: "2026-03-14".into(),
            preferred_time: "14:30".into(),
            add_ons: vec!["rush_service".into(), "extra_witness".into(), "rush_service".into()],
            notes: "  ".into(),
            ..contact()
        };
        let valid = validate_all(&draft).unwrap();

        assert_eq!(valid.name(), "John Doe");
        assert_eq!(valid.service_type(), ServiceType::LoanSigning);
        assert_eq!(valid.location(), Some("12 Main St"));
        assert_eq!(valid.document_count(), 4);
        assert_eq!(valid.preferred_date(), NaiveDate::from_ymd_opt(2026, 3, 14));
        assert_eq!(valid.preferred_time(), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(valid.add_ons(), &[AddOn::ExtraWitness, AddOn::RushService]);
        assert_eq!(valid.notes(), None);
    }

    #[test]
    fn document_count_defaults_to_one() {
        assert_eq!(validate_all(&complete()).unwrap().document_count(), 1);
    }

    #[test]
    fn document_count_must_be_bare_digits() {
        for raw in ["+3", "-3", "3.0", "3 docs"] {
            let draft = BookingDraft {
                document_count: raw.into(),
                ..complete()
            };
            let errors = validate_step(StepId::Service, &draft).unwrap_err();
            assert_eq!(
                errors.get(FieldId::DocumentCount),
                Some("must be a whole number of at least 1"),
                "{raw}"
            );
            assert!(validate_all(&draft).is_err(), "{raw}");
        }

        let padded = BookingDraft {
            document_count: " 3 ".into(),
            ..complete()
        };
        assert_eq!(validate_all(&padded).unwrap().document_count(), 3);
    }

    #[test]
    fn errors_render_with_labels() {
        let errors = validate_step(StepId::Contact, &BookingDraft {
            email: "bad".into(),
            ..contact()
        })
        .unwrap_err();
        assert_eq!(errors.to_string(), "Email: enter a valid email address");
    }
}
