// ── Step and field configuration ──
//
// The wizard is data: four steps, each listing its fields with a kind
// and a requirement rule. The validator and the CLI prompt renderer both
// walk this table, so adding a field means adding one `FieldSpec`.

use std::str::FromStr;

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::model::{AddOn, ServiceType};

/// Identity of every field a draft carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldId {
    Name,
    Email,
    Phone,
    SmsOptIn,
    ServiceType,
    Location,
    DocumentCount,
    PreferredDate,
    PreferredTime,
    AddOns,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepId {
    Contact,
    Service,
    Payment,
    Confirm,
}

/// Source of the options offered by a choice field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Services,
    AddOns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub key: &'static str,
    pub label: &'static str,
}

impl Catalog {
    pub fn options(self) -> Vec<ChoiceOption> {
        match self {
            Self::Services => ServiceType::iter()
                .map(|s| ChoiceOption {
                    key: s.key(),
                    label: s.label(),
                })
                .collect(),
            Self::AddOns => AddOn::iter()
                .map(|a| ChoiceOption {
                    key: a.key(),
                    label: a.label(),
                })
                .collect(),
        }
    }

    pub fn contains(self, key: &str) -> bool {
        match self {
            Self::Services => ServiceType::from_str(key).is_ok(),
            Self::AddOns => AddOn::from_str(key).is_ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Choice(Catalog),
    MultiChoice(Catalog),
    /// Positive integer.
    Count,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM` (24h)
    Time,
    /// Yes/no consent.
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    /// Required only when the chosen service sends someone on site.
    RequiredWhenInPerson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rule: Requirement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub id: StepId,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

const fn field(id: FieldId, label: &'static str, kind: FieldKind, rule: Requirement) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind,
        rule,
    }
}

pub static STEPS: [StepSpec; 4] = [
    StepSpec {
        id: StepId::Contact,
        title: "Contact information",
        fields: &[
            field(FieldId::Name, "Full name", FieldKind::Text, Requirement::Required),
            field(FieldId::Email, "Email", FieldKind::Email, Requirement::Required),
            field(FieldId::Phone, "Phone", FieldKind::Phone, Requirement::Required),
            field(
                FieldId::SmsOptIn,
                "Text me booking updates",
                FieldKind::Flag,
                Requirement::Optional,
            ),
        ],
    },
    StepSpec {
        id: StepId::Service,
        title: "Service details",
        fields: &[
            field(
                FieldId::ServiceType,
                "Service",
                FieldKind::Choice(Catalog::Services),
                Requirement::Required,
            ),
            field(
                FieldId::Location,
                "Appointment address",
                FieldKind::Text,
                Requirement::RequiredWhenInPerson,
            ),
            field(
                FieldId::DocumentCount,
                "Number of documents",
                FieldKind::Count,
                Requirement::Optional,
            ),
            field(
                FieldId::PreferredDate,
                "Preferred date (YYYY-MM-DD)",
                FieldKind::Date,
                Requirement::Optional,
            ),
            field(
                FieldId::PreferredTime,
                "Preferred time (HH:MM)",
                FieldKind::Time,
                Requirement::Optional,
            ),
        ],
    },
    StepSpec {
        id: StepId::Payment,
        title: "Add-ons and payment",
        fields: &[
            field(
                FieldId::AddOns,
                "Add-ons",
                FieldKind::MultiChoice(Catalog::AddOns),
                Requirement::Optional,
            ),
            field(FieldId::Notes, "Notes for the notary", FieldKind::Text, Requirement::Optional),
        ],
    },
    StepSpec {
        id: StepId::Confirm,
        title: "Review and confirm",
        fields: &[],
    },
];

impl StepId {
    /// Zero-based position in [`STEPS`].
    pub fn index(self) -> usize {
        match self {
            Self::Contact => 0,
            Self::Service => 1,
            Self::Payment => 2,
            Self::Confirm => 3,
        }
    }

    pub fn spec(self) -> &'static StepSpec {
        &STEPS[self.index()]
    }
}

impl FieldId {
    pub fn spec(self) -> Option<&'static FieldSpec> {
        STEPS
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.id == self)
    }

    pub fn label(self) -> &'static str {
        self.spec().map_or("field", |f| f.label)
    }
}
