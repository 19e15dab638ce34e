// Payment sessions from the hosted checkout function.

use std::sync::Arc;

use async_trait::async_trait;
use notarydesk_api::FunctionsClient;
use notarydesk_api::functions::CheckoutRequest;
use tracing::{debug, info};
use url::Url;

use super::PaymentGateway;
use crate::error::CoreError;
use crate::model::{BookingRecord, PaymentSession};

pub struct HostedPayments {
    functions: Arc<FunctionsClient>,
    success_url: Option<Url>,
    cancel_url: Option<Url>,
}

impl HostedPayments {
    pub fn new(
        functions: Arc<FunctionsClient>,
        success_url: Option<Url>,
        cancel_url: Option<Url>,
    ) -> Self {
        Self {
            functions,
            success_url,
            cancel_url,
        }
    }
}

#[async_trait]
impl PaymentGateway for HostedPayments {
    async fn create_session(&self, record: &BookingRecord) -> Result<PaymentSession, CoreError> {
        let request = CheckoutRequest {
            booking_id: record.id,
            service_type: record.service_type.key().to_owned(),
            add_ons: record.add_ons.iter().map(|a| a.key().to_owned()).collect(),
            customer_name: record.name.clone(),
            customer_email: record.email.clone(),
            success_url: self.success_url.as_ref().map(ToString::to_string),
            cancel_url: self.cancel_url.as_ref().map(ToString::to_string),
        };

        let session = self
            .functions
            .create_checkout_session(&request)
            .await
            .map_err(|e| {
                debug!(booking_id = %record.id, transient = e.is_transient(), "checkout call failed");
                CoreError::Payment {
                    message: CoreError::from(e).to_string(),
                }
            })?;

        info!(booking_id = %record.id, "checkout session created");
        session.try_into()
    }
}
