// ── Runtime backend configuration ──
//
// Describes how to reach the hosted backend and what the business looks
// like to customers. Carries key material but never touches disk; the CLI
// builds a `BackendConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use notarydesk_api::FunctionNames;
use notarydesk_api::transport::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Hosted projects always have valid certs.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-hosted development stacks).
    DangerAcceptInvalid,
}

/// Customer-facing contact details, shown on confirmation and included
/// in notification payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: "Notary Services".into(),
            phone: "(814) 480-0989".into(),
            email: "bookings@example.com".into(),
        }
    }
}

/// Everything needed to talk to one hosted backend project.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project root URL (e.g. `https://abc.example.co`).
    pub project_url: Url,
    /// Publishable key, sent on every request.
    pub anon_key: SecretString,
    /// Elevated key for admin status transitions and reads.
    pub admin_key: Option<SecretString>,
    pub tls: TlsVerification,
    /// Per-request timeout; the only timeout in the submission path.
    pub timeout: Duration,
    /// Bookings table name.
    pub table: String,
    pub functions: FunctionNames,
    /// Optional automation hook that receives every new booking.
    pub automation_webhook: Option<Url>,
    /// Where the checkout page sends the customer afterwards.
    pub success_url: Option<Url>,
    pub cancel_url: Option<Url>,
    pub business: BusinessProfile,
}

impl BackendConfig {
    /// Minimal config with defaults for everything but the project.
    pub fn new(project_url: Url, anon_key: SecretString) -> Self {
        Self {
            project_url,
            anon_key,
            admin_key: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            table: "bookings".into(),
            functions: FunctionNames::default(),
            automation_webhook: None,
            success_url: None,
            cancel_url: None,
            business: BusinessProfile::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
