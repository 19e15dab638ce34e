use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Keys for a hosted backend project.
///
/// The anonymous (publishable) key identifies the project on every request
/// via the `apikey` header. The admin key, when present, is sent as the
/// bearer token instead of the anonymous key so that row-level policies
/// allow status updates and reads of existing bookings.
#[derive(Debug, Clone)]
pub struct ProjectKeys {
    pub anon_key: SecretString,
    pub admin_key: Option<SecretString>,
}

impl ProjectKeys {
    pub fn anonymous(anon_key: SecretString) -> Self {
        Self {
            anon_key,
            admin_key: None,
        }
    }

    pub fn with_admin_key(mut self, admin_key: SecretString) -> Self {
        self.admin_key = Some(admin_key);
        self
    }

    /// Whether requests carry elevated (admin) authorization.
    pub fn is_admin(&self) -> bool {
        self.admin_key.is_some()
    }

    /// Build the default header set injected into every request.
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();

        let mut api_key = header_value(self.anon_key.expose_secret())?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let bearer = self.admin_key.as_ref().unwrap_or(&self.anon_key);
        let mut auth = header_value(&format!("Bearer {}", bearer.expose_secret()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(headers)
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(raw).map_err(|e| Error::InvalidKey(format!("invalid header value: {e}")))
}
