// ── Service catalog ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Bookable service. The wire/key form is snake_case (`mobile_notary`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceType {
    /// Remote Online Notarization over video.
    Ron,
    MobileNotary,
    LoanSigning,
    Apostille,
    BusinessFormation,
}

impl ServiceType {
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ron => "Remote Online Notarization",
            Self::MobileNotary => "Mobile Notary",
            Self::LoanSigning => "Loan Signing",
            Self::Apostille => "Apostille Services",
            Self::BusinessFormation => "Business Formation",
        }
    }

    /// Whether a notary travels to the customer, making an address mandatory.
    pub fn is_in_person(self) -> bool {
        matches!(self, Self::MobileNotary | Self::LoanSigning)
    }
}

/// Optional extras selectable on the payment step.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddOn {
    ExtraWitness,
    RushService,
    PrintedCopies,
    AfterHours,
}

impl AddOn {
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ExtraWitness => "Additional witness",
            Self::RushService => "Rush (same-day) service",
            Self::PrintedCopies => "Printed copies",
            Self::AfterHours => "After-hours appointment",
        }
    }
}
