// notarydesk-api: Async Rust clients for the hosted booking backend.
//
// Three surfaces share one transport: the REST table API (bookings),
// hosted functions (checkout, email, SMS, CRM) and plain automation
// webhooks.

pub mod auth;
pub mod error;
pub mod functions;
pub mod rest;
pub mod transport;
pub mod webhook;

mod response;

pub use auth::ProjectKeys;
pub use error::Error;
pub use functions::{FunctionNames, FunctionsClient};
pub use rest::RestClient;
pub use transport::{TlsMode, TransportConfig};
pub use webhook::WebhookClient;
