//! HTTP client abstraction for testability

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use super::types::ProviderError;

/// Trait for blocking HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests. Credentials are a concern of the
/// implementation and never appear in the arguments, so callers can derive
/// cache keys from them.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request, without query string
    /// * `query` - Query parameters, URL-encoded by the client
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ProviderError>;

    /// Performs an HTTP POST request with a JSON body.
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("etappe/", env!("CARGO_PKG_VERSION"));

impl ReqwestClient {
    /// Creates a client without credentials and the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS), None)
    }

    /// Creates a client with a custom timeout.
    ///
    /// When `api_key` is given it is sent in the `Authorization` header of
    /// every request.
    pub fn with_timeout(timeout: Duration, api_key: Option<&str>) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(key).map_err(|e| {
                ProviderError::UpstreamUnavailable(format!("Invalid API key: {}", e))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ProviderError::UpstreamUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    fn send(
        &self,
        method: &str,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<Vec<u8>, ProviderError> {
        trace!(method = method, url = url, "HTTP request starting");

        let response = match request.send() {
            Ok(resp) => {
                debug!(
                    method = method,
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    method = method,
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ProviderError::UpstreamUnavailable(format!(
                    "Request failed: {}",
                    e
                )));
            }
        };

        // Check HTTP status
        if !response.status().is_success() {
            warn!(
                method = method,
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(ProviderError::UpstreamUnavailable(format!(
                "HTTP {} from {} {}",
                response.status(),
                method,
                url
            )));
        }

        response.bytes().map(|b| b.to_vec()).map_err(|e| {
            ProviderError::UpstreamUnavailable(format!("Failed to read response: {}", e))
        })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ProviderError> {
        self.send("GET", url, self.client.get(url).query(query))
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Vec<u8>, ProviderError> {
        self.send("POST", url, self.client.post(url).json(body))
    }
}

/// Decodes a JSON response body.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(body)
        .map_err(|e| ProviderError::UpstreamMalformed(format!("Invalid JSON: {}", e)))
}
