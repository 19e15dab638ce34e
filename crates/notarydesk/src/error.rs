//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use notarydesk_config::ConfigError;
use notarydesk_core::{CoreError, FieldErrors};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the booking backend at {url}")]
    #[diagnostic(
        code(notarydesk::connection_failed),
        help(
            "Check the project URL and your network connection.\n\
             Local stacks with self-signed certificates need --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(notarydesk::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("The backend rejected the project key")]
    #[diagnostic(
        code(notarydesk::auth_failed),
        help(
            "Check the anon key for this project, or store an admin key for\n\
             status changes: notarydesk config set-key --admin"
        )
    )]
    AuthFailed { message: String },

    #[error("No {kind} configured for profile '{profile}'")]
    #[diagnostic(
        code(notarydesk::no_credentials),
        help(
            "Configure credentials with: notarydesk config init\n\
             Or set the NOTARYDESK_ANON_KEY environment variable."
        )
    )]
    NoCredentials { profile: String, kind: String },

    // ── Bookings ─────────────────────────────────────────────────────
    #[error("Booking '{id}' not found")]
    #[diagnostic(
        code(notarydesk::not_found),
        help("Booking IDs are full UUIDs, as printed by `notarydesk book`.")
    )]
    BookingNotFound { id: String },

    #[error("The booking form has {count} problem(s)")]
    #[diagnostic(code(notarydesk::invalid_draft), help("{details}"))]
    InvalidDraft { count: usize, details: String },

    #[error("Could not save the booking")]
    #[diagnostic(
        code(notarydesk::persistence),
        help("{message}\nNothing was charged and no confirmation was sent.")
    )]
    Persistence { message: String },

    /// The payment toast already named the reference and contact.
    #[error("Booking {reference} is pending: checkout could not be started")]
    #[diagnostic(code(notarydesk::payment_unavailable))]
    PaymentUnavailable { reference: String },

    #[error("The booking may have been saved but could not be confirmed")]
    #[diagnostic(
        code(notarydesk::save_unconfirmed),
        help("Do not submit it again until the business confirms it. Run with -v for details.")
    )]
    SaveUnconfirmed,

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend error ({code}): {message}")]
    #[diagnostic(code(notarydesk::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(notarydesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(notarydesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: notarydesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(notarydesk::no_config),
        help(
            "Create a profile with: notarydesk config init\n\
             Or pass --project-url and --anon-key.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("{message}")]
    #[diagnostic(code(notarydesk::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(notarydesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("The booking wizard needs an interactive terminal")]
    #[diagnostic(
        code(notarydesk::not_a_terminal),
        help("Pass a JSON draft instead: notarydesk book --from-file draft.json")
    )]
    NotATerminal,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(notarydesk::render))]
    Render(String),

    #[error("Invalid JSON draft: {0}")]
    #[diagnostic(
        code(notarydesk::json),
        help("Check the draft file; keys match the wizard fields (name, email, phone, ...).")
    )]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::BookingNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::InvalidDraft { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NotATerminal
            | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<FieldErrors> for CliError {
    fn from(errors: FieldErrors) -> Self {
        let details = errors
            .iter()
            .map(|e| format!("{}: {}", e.field.label(), e.message))
            .collect::<Vec<_>>()
            .join("\n");
        CliError::InvalidDraft {
            count: errors.len(),
            details,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => errors.into(),

            CoreError::Persistence { message } => CliError::Persistence { message },

            CoreError::SaveUnconfirmed { .. } => CliError::SaveUnconfirmed,

            CoreError::Payment { message } => CliError::ApiError {
                code: "payment".into(),
                message,
            },

            CoreError::Notification { channel, message } => CliError::ApiError {
                code: channel.into(),
                message,
            },

            CoreError::BookingNotFound { id } => CliError::BookingNotFound { id },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .or_else(|| status.as_ref().map(ToString::to_string))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile, kind } => CliError::NoCredentials {
                profile,
                kind: kind.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
