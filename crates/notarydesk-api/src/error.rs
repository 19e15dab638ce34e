use thiserror::Error;

/// Top-level error type for the `notarydesk-api` crate.
///
/// Covers every failure mode across the REST, functions and webhook
/// surfaces. `notarydesk-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The project rejected the supplied key (HTTP 401/403).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// A key could not be turned into a header value.
    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Rate limited by the backend. Includes retry-after in seconds.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error returned by the REST or functions gateway.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A write asked for its representation but the backend returned no rows.
    #[error("Empty response from {resource}")]
    EmptyResponse { resource: String },
}

impl Error {
    /// Returns `true` if repeating the request by hand may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
