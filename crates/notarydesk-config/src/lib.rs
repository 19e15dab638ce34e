//! Configuration for the notarydesk CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `notarydesk_core::BackendConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use notarydesk_api::FunctionNames;
use notarydesk_core::{BackendConfig, BusinessProfile, TlsVerification};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Keyring service name; entries are keyed `{profile}/{kind}`.
pub const KEYRING_SERVICE: &str = "notarydesk";

/// Env prefix. Nested keys use a double underscore:
/// `NOTARYDESK_DEFAULTS__TIMEOUT=10`.
const ENV_PREFIX: &str = "NOTARYDESK_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {kind} configured for profile '{profile}'")]
    NoCredentials { profile: String, kind: KeyKind },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Overrides for the hosted function names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FunctionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm: Option<String>,
}

impl FunctionOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn resolve(&self) -> FunctionNames {
        let defaults = FunctionNames::default();
        FunctionNames {
            checkout: self.checkout.clone().unwrap_or(defaults.checkout),
            email: self.email.clone().unwrap_or(defaults.email),
            sms: self.sms.clone().unwrap_or(defaults.sms),
            crm: self.crm.clone().unwrap_or(defaults.crm),
        }
    }
}

/// A named backend project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Project root URL (e.g. "https://abc.example.co").
    pub project_url: String,

    /// Publishable key (plaintext; it is public by nature).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Environment variable holding the publishable key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key_env: Option<String>,

    /// Admin key (plaintext -- prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<String>,

    /// Environment variable holding the admin key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_key_env: Option<String>,

    /// Bookings table (defaults to "bookings").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default, skip_serializing_if = "FunctionOverrides::is_empty")]
    pub functions: FunctionOverrides,

    /// Automation webhook receiving every new booking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation_webhook: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,

    /// Path to custom CA certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(project_url: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            ..Self::default()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "notarydesk", "notarydesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("notarydesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file (missing files fall back to defaults).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Which project key a secret is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Anon,
    Admin,
}

impl KeyKind {
    fn keyring_entry(self, profile_name: &str) -> String {
        match self {
            Self::Anon => format!("{profile_name}/anon-key"),
            Self::Admin => format!("{profile_name}/admin-key"),
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anon => f.write_str("anon key"),
            Self::Admin => f.write_str("admin key"),
        }
    }
}

/// Store a key in the system keyring for a profile.
pub fn store_key(profile_name: &str, kind: KeyKind, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_entry(profile_name))?;
    entry.set_password(secret)?;
    Ok(())
}

/// Look a key up: profile env var, then keyring, then plaintext.
fn lookup_key(profile: &Profile, profile_name: &str, kind: KeyKind) -> Option<SecretString> {
    let (env_name, plaintext) = match kind {
        KeyKind::Anon => (&profile.anon_key_env, &profile.anon_key),
        KeyKind::Admin => (&profile.admin_key_env, &profile.admin_key),
    };

    // 1. Profile's *_env → env var lookup
    if let Some(env_name) = env_name {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_entry(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    plaintext.clone().map(SecretString::from)
}

pub fn resolve_anon_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    lookup_key(profile, profile_name, KeyKind::Anon).ok_or_else(|| ConfigError::NoCredentials {
        profile: profile_name.into(),
        kind: KeyKind::Anon,
    })
}

/// The admin key is optional; without it only inserts are authorized.
pub fn resolve_admin_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    lookup_key(profile, profile_name, KeyKind::Admin)
}

// ── Translation ─────────────────────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

fn parse_optional_url(field: &str, raw: Option<&String>) -> Result<Option<Url>, ConfigError> {
    raw.map(|r| parse_url(field, r)).transpose()
}

/// Build a `BackendConfig` from a profile and already-resolved keys.
///
/// `defaults` supplies timeout and TLS settings the profile leaves unset.
pub fn build_backend_config(
    profile: &Profile,
    defaults: &Defaults,
    anon_key: SecretString,
    admin_key: Option<SecretString>,
) -> Result<BackendConfig, ConfigError> {
    let project_url = parse_url("project_url", &profile.project_url)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let fallback = BusinessProfile::default();
    let business = BusinessProfile {
        name: profile.business_name.clone().unwrap_or(fallback.name),
        phone: profile.business_phone.clone().unwrap_or(fallback.phone),
        email: profile.business_email.clone().unwrap_or(fallback.email),
    };

    let mut config = BackendConfig::new(project_url, anon_key);
    config.admin_key = admin_key;
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    if let Some(ref table) = profile.table {
        config.table.clone_from(table);
    }
    config.functions = profile.functions.resolve();
    config.automation_webhook =
        parse_optional_url("automation_webhook", profile.automation_webhook.as_ref())?;
    config.success_url = parse_optional_url("success_url", profile.success_url.as_ref())?;
    config.cancel_url = parse_optional_url("cancel_url", profile.cancel_url.as_ref())?;
    config.business = business;

    Ok(config)
}

/// Build a `BackendConfig` from a profile, resolving keys from env,
/// keyring and plaintext. No CLI flag overrides.
pub fn profile_to_backend_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<BackendConfig, ConfigError> {
    let anon_key = resolve_anon_key(profile, profile_name)?;
    let admin_key = resolve_admin_key(profile, profile_name);
    build_backend_config(profile, defaults, anon_key, admin_key)
}
