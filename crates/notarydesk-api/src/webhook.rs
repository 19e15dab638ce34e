// Automation webhook client
//
// Posts JSON to a fully qualified URL (workflow automation hooks). No
// project headers: webhook URLs carry their own secret path segment.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::response::handle_empty;
use crate::transport::TransportConfig;

pub struct WebhookClient {
    http: reqwest::Client,
    url: Url,
}

impl WebhookClient {
    pub fn new(url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            url,
        })
    }

    pub async fn post<B: Serialize + Sync>(&self, body: &B) -> Result<(), Error> {
        debug!(host = self.url.host_str().unwrap_or_default(), "POST webhook");

        let resp = self.http.post(self.url.clone()).json(body).send().await?;
        handle_empty(resp).await
    }
}
