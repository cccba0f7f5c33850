//! HTTP client with connection pooling and JSON decoding

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use vouch_errors::{Error, NetworkError};

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: format!("vouch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }

    /// Execute a GET request and decode the JSON body
    ///
    /// Sends `Accept: application/json` plus any caller-supplied headers and
    /// applies `timeout` to the whole call, body included.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success HTTP status, or a
    /// body that does not decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
        headers: &[(&str, &str)],
    ) -> Result<T, Error> {
        let mut request = self
            .client
            .get(url)
            .timeout(timeout)
            .header(ACCEPT, "application/json");
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| Self::map_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            }
            .into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| {
                NetworkError::InvalidResponse {
                    message: e.to_string(),
                }
                .into()
            })
    }

    fn map_error(url: &str, error: &reqwest::Error) -> Error {
        if error.is_timeout() {
            NetworkError::Timeout {
                url: url.to_string(),
            }
            .into()
        } else if error.is_builder() {
            NetworkError::InvalidUrl(error.to_string()).into()
        } else {
            NetworkError::ConnectionFailed(error.to_string()).into()
        }
    }

    /// Get the underlying reqwest client for advanced usage
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn get_json_decodes_success_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/ok")
                .header("accept", "application/json")
                .header("x-extra", "1");
            then.status(200).json_body(serde_json::json!({"value": 7}));
        });

        #[derive(serde::Deserialize)]
        struct Body {
            value: u32,
        }

        let client = NetClient::with_defaults().unwrap();
        let body: Body = client
            .get_json(
                &server.url("/ok"),
                Duration::from_secs(5),
                &[("x-extra", "1")],
            )
            .await
            .unwrap();
        assert_eq!(body.value, 7);
    }

    #[tokio::test]
    async fn get_json_maps_http_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let client = NetClient::with_defaults().unwrap();
        let err = client
            .get_json::<serde_json::Value>(&server.url("/missing"), Duration::from_secs(5), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::HttpError { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn get_json_maps_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/garbage");
            then.status(200).body("not json at all");
        });

        let client = NetClient::with_defaults().unwrap();
        let err = client
            .get_json::<serde_json::Value>(&server.url("/garbage"), Duration::from_secs(5), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::InvalidResponse { .. })
        ));
    }
}
