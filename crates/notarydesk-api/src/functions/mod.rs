// Hosted functions
//
// Serverless functions deployed alongside the REST API, invoked with
// `POST /functions/v1/{name}` and a camelCase JSON body. Each function the
// booking flow depends on has a typed wrapper in its own file.

pub mod checkout;
pub mod client;
pub mod messaging;
pub mod types;

pub use client::{FunctionNames, FunctionsClient};
pub use types::{BookingSummary, CheckoutRequest, CheckoutSession, CrmContact, EmailRequest, SmsRequest};
