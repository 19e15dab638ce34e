// Hosted functions HTTP client
//
// Base path: /functions/v1/
// Auth: the same project key headers as the REST client.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::ProjectKeys;
use crate::error::Error;
use crate::response::{handle_empty, handle_response};
use crate::rest::client::normalize_base_url;
use crate::transport::TransportConfig;

const FUNCTIONS_PREFIX: &str = "functions/v1";

/// Deployed names of the functions the booking flow calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNames {
    pub checkout: String,
    pub email: String,
    pub sms: String,
    pub crm: String,
}

impl Default for FunctionNames {
    fn default() -> Self {
        Self {
            checkout: "create-checkout-session".into(),
            email: "send-booking-email".into(),
            sms: "send-booking-sms".into(),
            crm: "sync-crm-contact".into(),
        }
    }
}

/// Async client for hosted functions.
pub struct FunctionsClient {
    http: reqwest::Client,
    base_url: Url,
    names: FunctionNames,
}

impl FunctionsClient {
    /// Build from project keys and a transport config.
    pub fn new(
        project_url: &str,
        keys: &ProjectKeys,
        transport: &TransportConfig,
        names: FunctionNames,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(keys.headers()?)?;
        Self::from_reqwest(project_url, http, names)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        project_url: &str,
        http: reqwest::Client,
        names: FunctionNames,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(project_url, FUNCTIONS_PREFIX)?,
            names,
        })
    }

    /// The configured function names.
    pub fn names(&self) -> &FunctionNames {
        &self.names
    }

    fn function_url(&self, name: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(name)?)
    }

    /// Invoke a function and decode its JSON answer.
    pub async fn invoke<T, B>(&self, name: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = self.function_url(name)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    /// Invoke a function whose answer carries nothing the caller needs.
    pub async fn invoke_no_response<B: Serialize + Sync>(
        &self,
        name: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.function_url(name)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        handle_empty(resp).await
    }
}
