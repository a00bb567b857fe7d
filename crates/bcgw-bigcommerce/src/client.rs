//! HTTP client for the BigCommerce v3 store API.
//!
//! Wraps `reqwest` with the fixed base URL and the static `X-Auth-Token`
//! header every call carries. Methods return the raw response and never
//! error on a non-2xx status line — classification is the adapters' job.
//! Only transport-level failures (DNS, connect, timeout) become errors.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use bcgw_core::ErrorDetail;

use crate::error::CatalogError;

const USER_AGENT: &str = "bcgw/0.1 (catalog-gateway)";

/// Client for the BigCommerce store-scoped REST API.
///
/// Use [`UpstreamClient::new`] for production or
/// [`UpstreamClient::with_base_url`] to point at a mock server in tests
/// (the two are the same; the alias keeps call sites honest about intent).
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    token: String,
}

impl UpstreamClient {
    /// Creates a new client bound to `base_url` (the store API root, e.g.
    /// `https://api.bigcommerce.com/stores/{hash}/v3`).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, token: &str, timeout_secs: u64) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        })
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`UpstreamClient::new`].
    pub fn with_base_url(
        base_url: &str,
        token: &str,
        timeout_secs: u64,
    ) -> Result<Self, CatalogError> {
        Self::new(base_url, token, timeout_secs)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a GET. `query` pairs are appended as-is; pagination callers
    /// pass only the parameters they were given.
    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response, CatalogError> {
        let response = self
            .client
            .get(self.url(path))
            .header("X-Auth-Token", &self.token)
            .query(query)
            .send()
            .await?;
        Ok(response)
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, CatalogError> {
        let response = self
            .client
            .post(self.url(path))
            .header("X-Auth-Token", &self.token)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, CatalogError> {
        let response = self
            .client
            .put(self.url(path))
            .header("X-Auth-Token", &self.token)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<Response, CatalogError> {
        let response = self
            .client
            .delete(self.url(path))
            .header("X-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await?;
        Ok(response)
    }

    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: Form,
    ) -> Result<Response, CatalogError> {
        let response = self
            .client
            .post(self.url(path))
            .header("X-Auth-Token", &self.token)
            .multipart(form)
            .send()
            .await?;
        Ok(response)
    }
}

/// Reads the body and parses it as `T`, tagging failures with `context`
/// so a mismatched upstream schema is attributable to one endpoint.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, CatalogError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| CatalogError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// Reads an upstream error body leniently.
///
/// BigCommerce usually answers errors with a structured problem document,
/// but not always (plain 400s on image upload, HTML from intermediaries).
/// A body that doesn't parse yields an empty [`ErrorDetail`] and callers
/// fall back to adapter-authored messages.
pub(crate) async fn read_error_detail(response: Response) -> Result<ErrorDetail, CatalogError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body).unwrap_or_default())
}
