// Email, SMS and CRM functions.
//
// Fire-and-forget from the caller's point of view: success carries no
// payload, so the response body is never decoded.

use crate::error::Error;
use crate::functions::client::FunctionsClient;
use crate::functions::types::{CrmContact, EmailRequest, SmsRequest};

impl FunctionsClient {
    pub async fn send_email(&self, request: &EmailRequest) -> Result<(), Error> {
        self.invoke_no_response(&self.names().email, request).await
    }

    pub async fn send_sms(&self, request: &SmsRequest) -> Result<(), Error> {
        self.invoke_no_response(&self.names().sms, request).await
    }

    pub async fn sync_crm_contact(&self, contact: &CrmContact) -> Result<(), Error> {
        self.invoke_no_response(&self.names().crm, contact).await
    }
}
