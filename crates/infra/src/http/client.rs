//! Shared reqwest client with a per-request timeout.
//!
//! Requests are sent exactly once. Failed calls surface to the caller, which
//! owns any retry decision.

use std::time::Duration;

use calbridge_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use calbridge_domain::CalBridgeError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

const DEFAULT_USER_AGENT: &str = concat!("calbridge/", env!("CARGO_PKG_VERSION"));

/// Shared outbound HTTP client. Requests are sent once.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, CalBridgeError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder` once. Non-success statuses are returned as responses,
    /// not errors; transport failures map to `RemoteService`.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, CalBridgeError> {
        let request = builder.build().map_err(|err| CalBridgeError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = redacted_url(request.url());
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// URL without its query string, which may carry codes or tokens.
fn redacted_url(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient, CalBridgeError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .no_proxy()
            .build()
            .map_err(|err| CalBridgeError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
