// REST table HTTP client
//
// Wraps `reqwest::Client` with project URL normalization, PostgREST
// filter syntax and the `Prefer: return=representation` convention used
// to read rows back from writes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::ProjectKeys;
use crate::error::Error;
use crate::response::handle_response;
use crate::transport::TransportConfig;

const REST_PREFIX: &str = "rest/v1";
const PREFER_REPRESENTATION: &str = "return=representation";

/// Raw HTTP client for one table of the hosted REST API.
///
/// Every write asks for its representation, so inserts and updates return
/// the affected rows. Filters use the `column=eq.value` syntax.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    table: String,
}

impl RestClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from project keys and a transport config.
    ///
    /// `project_url` is the project root (e.g. `https://abc.example.co`);
    /// a trailing `/rest/v1` is tolerated.
    pub fn new(
        project_url: &str,
        keys: &ProjectKeys,
        transport: &TransportConfig,
        table: impl Into<String>,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(keys.headers()?)?;
        Self::from_reqwest(project_url, http, table)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        project_url: &str,
        http: reqwest::Client,
        table: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(project_url, REST_PREFIX)?,
            table: table.into(),
        })
    }

    fn table_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(&self.table)?)
    }

    // ── Table operations ─────────────────────────────────────────────

    /// Insert one row and return its stored representation.
    pub(crate) async fn insert_returning<T, B>(&self, row: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = self.table_url()?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(row)
            .send()
            .await?;

        let rows: Vec<T> = handle_response(resp).await?;
        rows.into_iter().next().ok_or_else(|| Error::EmptyResponse {
            resource: self.table.clone(),
        })
    }

    /// Select the first row matching all `eq` filters.
    pub(crate) async fn select_one<T: DeserializeOwned>(
        &self,
        filters: &[(&str, String)],
    ) -> Result<Option<T>, Error> {
        let url = self.table_url()?;
        let params = eq_params(filters);
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(&params)
            .query(&[("select", "*"), ("limit", "1")])
            .send()
            .await?;

        let rows: Vec<T> = handle_response(resp).await?;
        Ok(rows.into_iter().next())
    }

    /// Patch rows matching all `eq` filters, returning the first updated row.
    ///
    /// `Ok(None)` means the filter matched nothing.
    pub(crate) async fn update_returning<T, B>(
        &self,
        filters: &[(&str, String)],
        patch: &B,
    ) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = self.table_url()?;
        let params = eq_params(filters);
        debug!("PATCH {url} params={params:?}");

        let resp = self
            .http
            .patch(url)
            .header("Prefer", PREFER_REPRESENTATION)
            .query(&params)
            .json(patch)
            .send()
            .await?;

        let rows: Vec<T> = handle_response(resp).await?;
        Ok(rows.into_iter().next())
    }
}

fn eq_params(filters: &[(&str, String)]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(column, value)| ((*column).to_owned(), format!("eq.{value}")))
        .collect()
}

/// Build `{project}/{prefix}/` from a project URL, tolerating a prefix
/// that is already present.
pub(crate) fn normalize_base_url(raw: &str, prefix: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();

    if path.ends_with(prefix) {
        url.set_path(&format!("{path}/"));
    } else {
        url.set_path(&format!("{path}/{prefix}/"));
    }

    Ok(url)
}
