//! The authenticated, versioned request pipeline.
//!
//! Every Kraken call funnels through [`KrakenClient::request`]:
//! - credentials are validated before any network I/O
//! - the client id is appended to the query string
//! - the protocol generation and auth headers are attached
//! - one round trip is made, with no retry or caching
//! - non-success statuses are classified without reading the body

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::credentials::CredentialStore;
use crate::error::{Result, classify_status};
use crate::serialize::to_lowercase_json;
use crate::version::ApiVersion;

/// Build the shared HTTP client used by [`KrakenClient::new`].
pub fn default_client() -> Client {
    let provider = Arc::new(ring::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .expect("Failed to configure default TLS protocol versions")
        .with_platform_verifier()
        .expect("Failed to configure platform certificate verifier")
        .with_no_client_auth();

    Client::builder()
        .use_preconfigured_tls(tls_config)
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
}

/// Client for the Kraken REST surface.
///
/// Cheap to clone; clones share the HTTP connection pool and the credential
/// store.
#[derive(Clone)]
pub struct KrakenClient {
    http: Client,
    credentials: CredentialStore,
    base_url: String,
}

impl KrakenClient {
    /// Kraken API root.
    pub const BASE_URL: &str = "https://api.twitch.tv/kraken";

    /// Create a client with the default HTTP transport.
    pub fn new(credentials: CredentialStore) -> Self {
        Self::with_client(default_client(), credentials)
    }

    /// Create a client over an existing `reqwest::Client`.
    pub fn with_client(http: Client, credentials: CredentialStore) -> Self {
        Self {
            http,
            credentials,
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Override the API root, mainly useful in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The credential store this client reads from.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// GET, returning the raw response body.
    pub async fn get(&self, url: &str, api: ApiVersion) -> Result<String> {
        self.request(Method::GET, url, None, api).await
    }

    /// GET, decoding the response body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, api: ApiVersion) -> Result<T> {
        let body = self.get(url, api).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a model, encoded with lowercased keys.
    pub async fn post<B: Serialize>(
        &self,
        url: &str,
        model: &B,
        api: ApiVersion,
    ) -> Result<String> {
        let payload = to_lowercase_json(model)?;
        self.request(Method::POST, url, Some(payload), api).await
    }

    /// POST a model and decode the response body.
    pub async fn post_json<T, B>(&self, url: &str, model: &B, api: ApiVersion) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = self.post(url, model, api).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a pre-encoded payload as-is.
    pub async fn post_raw(
        &self,
        url: &str,
        payload: impl Into<String>,
        api: ApiVersion,
    ) -> Result<String> {
        self.request(Method::POST, url, Some(payload.into()), api)
            .await
    }

    /// PUT a model, encoded with lowercased keys.
    pub async fn put<B: Serialize>(&self, url: &str, model: &B, api: ApiVersion) -> Result<String> {
        let payload = to_lowercase_json(model)?;
        self.request(Method::PUT, url, Some(payload), api).await
    }

    /// PUT a model and decode the response body.
    pub async fn put_json<T, B>(&self, url: &str, model: &B, api: ApiVersion) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = self.put(url, model, api).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// DELETE, returning the raw response body.
    pub async fn delete(&self, url: &str, api: ApiVersion) -> Result<String> {
        self.request(Method::DELETE, url, None, api).await
    }

    /// DELETE and decode the response body.
    pub async fn delete_json<T: DeserializeOwned>(&self, url: &str, api: ApiVersion) -> Result<T> {
        let body = self.delete(url, api).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolve `url` against the API root when it is not absolute.
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        }
    }

    /// Append the client id to the query string.
    fn append_client_id(url: &str, client_id: &str) -> String {
        if url.contains('?') {
            format!("{url}&client_id={client_id}")
        } else {
            format!("{url}?client_id={client_id}")
        }
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        payload: Option<String>,
        api: ApiVersion,
    ) -> Result<String> {
        let credentials = self.credentials.snapshot();
        credentials.validate()?;

        // Log the target before the client id is appended; credentials stay
        // out of the logs.
        let target = self.resolve_url(url);
        debug!(method = %method, url = %target, version = api.number(), "dispatching request");
        let url = Self::append_client_id(&target, credentials.client_id());

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, api.accept());

        if let Some(token) = credentials.access_token().filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("OAuth {token}"));
        }

        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, url = %target, "request rejected");
            return Err(classify_status(status));
        }

        Ok(response.text().await?)
    }
}
