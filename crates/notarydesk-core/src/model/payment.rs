// ── Payment session ──

use url::Url;

/// Checkout session returned by the payment provider. Only the redirect
/// is used; nothing about the session is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub url: Url,
    pub session_id: Option<String>,
}
