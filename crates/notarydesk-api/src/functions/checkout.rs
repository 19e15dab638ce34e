// Checkout-session function.

use crate::error::Error;
use crate::functions::client::FunctionsClient;
use crate::functions::types::{CheckoutRequest, CheckoutSession};

impl FunctionsClient {
    /// Ask the payment provider (via the checkout function) for a session.
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, Error> {
        self.invoke(&self.names().checkout, request).await
    }
}
