// Response handling shared by every client.
//
// Success bodies are decoded as JSON; failures are mapped into
// `Error` using whichever error shape the gateway returned.

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Error body shapes: the REST gateway uses `{message, code, details, hint}`,
/// hosted functions conventionally return `{error}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

pub(crate) async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        return Error::RateLimited { retry_after_secs };
    }

    let raw = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorResponse>(&raw).ok();

    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone().or_else(|| e.error.clone()))
        .map(|m| match parsed.as_ref().and_then(|e| e.details.as_deref()) {
            Some(details) => format!("{m} ({details})"),
            None => m,
        })
        .unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw.clone()
            }
        });

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Error::Unauthorized { message };
    }

    Error::Api {
        status: status.as_u16(),
        message,
        code: parsed.and_then(|e| e.code),
    }
}
