// ── Core error types ──
//
// Domain-facing errors from notarydesk-core. Consumers never match on HTTP
// status codes or JSON failures directly; `From<notarydesk_api::Error>`
// translates transport-layer errors into these variants.

use thiserror::Error;

use crate::wizard::FieldErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Booking flow ─────────────────────────────────────────────────
    /// One or more fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The booking record could not be written. Nothing else was attempted.
    #[error("Could not save booking: {message}")]
    Persistence { message: String },

    /// The store accepted the write but its reply named no readable record,
    /// so whether the booking exists is unknown. Resubmitting may duplicate it.
    #[error("Booking may have been saved but could not be confirmed: {message}")]
    SaveUnconfirmed { message: String },

    /// The payment provider did not return a checkout session.
    #[error("Payment session unavailable: {message}")]
    Payment { message: String },

    /// A best-effort notification failed. Only ever logged.
    #[error("{channel} notification failed: {message}")]
    Notification {
        channel: &'static str,
        message: String,
    },

    #[error("Booking not found: {id}")]
    BookingNotFound { id: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Backend errors (wrapped, not exposed raw) ────────────────────
    #[error("Backend error: {message}")]
    Api {
        message: String,
        /// Backend-specific error code (e.g. a database constraint code).
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<notarydesk_api::Error> for CoreError {
    fn from(err: notarydesk_api::Error) -> Self {
        match err {
            notarydesk_api::Error::Unauthorized { message } => {
                CoreError::AuthenticationFailed { message }
            }
            notarydesk_api::Error::InvalidKey(message) => CoreError::Config {
                message: format!("Invalid API key: {message}"),
            },
            notarydesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            notarydesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            notarydesk_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            notarydesk_api::Error::RateLimited { retry_after_secs } => CoreError::Api {
                message: format!("Rate limited -- retry after {retry_after_secs}s"),
                code: Some("rate_limited".into()),
                status: Some(429),
            },
            notarydesk_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            notarydesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            notarydesk_api::Error::EmptyResponse { resource } => {
                CoreError::Internal(format!("Backend returned no rows for {resource}"))
            }
        }
    }
}

impl CoreError {
    /// Short, user-presentable text for toasts.
    ///
    /// Backend detail (response bodies, constraint names) stays in the
    /// `Display` text for logs and never reaches the customer.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::ConnectionFailed { .. } | Self::Timeout => {
                "We couldn't reach the booking service. Please try again.".into()
            }
            Self::Persistence { .. } => {
                "We couldn't save your booking. Nothing was charged; please try again.".into()
            }
            Self::SaveUnconfirmed { .. } => {
                "We may have received your booking but couldn't confirm it. \
                 Please contact us before booking again."
                    .into()
            }
            Self::Payment { .. } => "Checkout could not be started.".into(),
            Self::Notification { .. } | Self::Api { .. } | Self::Internal(_) => {
                "Something went wrong on our side. Please try again later.".into()
            }
            other => other.to_string(),
        }
    }
}
