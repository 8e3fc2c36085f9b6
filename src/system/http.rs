// src/system/http.rs

//! HTTP GET capability consumed by the remote repository.
//!
//! Transport problems are classified into timeout, network and status errors
//! here; the repository layer translates them into domain errors and never
//! lets them escape.

use async_trait::async_trait;
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A completed HTTP exchange with a 2xx status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    /// Final URL after redirects.
    pub url: String,
}

#[derive(Error, Debug)]
pub enum HttpError {
    /// The per-request timeout elapsed.
    #[error("Request to '{url}' timed out after {timeout_ms} ms")]
    Timeout {
        /// The requested URL.
        url: String,
        /// The configured timeout.
        timeout_ms: u64,
    },
    /// The connection could not be made or was cut.
    #[error("Network error while requesting '{url}': {source}")]
    Network {
        /// The requested URL.
        url: String,
        /// The transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The server answered with a non-2xx status.
    #[error("Request to '{url}' failed with HTTP status {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The status code received.
        status: u16,
    },
}

/// Minimal GET capability. Implementations must enforce their own timeout.
#[async_trait]
pub trait HttpClient: Send + Sync + fmt::Debug {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// `reqwest`-backed client with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// # Errors
    /// Fails if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("claude-cmd/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> HttpError {
        if error.is_timeout() {
            HttpError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout_ms(),
            }
        } else {
            HttpError::Network {
                url: url.to_string(),
                source: Box::new(error),
            }
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        trace!("GET {} -> {} ({} bytes)", url, status.as_u16(), body.len());

        Ok(HttpResponse {
            status: status.as_u16(),
            headers,
            body,
            url: final_url,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/commands/en/manifest.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"commands\": []}"))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/commands/en/manifest.json", server.uri());
        let response = client.get(&url).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "{\"commands\": []}");
        assert_eq!(response.url, url);
    }

    #[tokio::test]
    async fn test_non_success_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new(Duration::from_secs(5)).unwrap();
        let result = client.get(&format!("{}/missing", server.uri())).await;

        assert!(matches!(result, Err(HttpError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_slow_response_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new(Duration::from_millis(100)).unwrap();
        let result = client.get(&format!("{}/slow", server.uri())).await;

        assert!(matches!(result, Err(HttpError::Timeout { timeout_ms: 100, .. })));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_network_error() {
        let client = ReqwestHttpClient::new(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on localhost is closed on any sane test machine.
        let result = client.get("http://127.0.0.1:9/manifest.json").await;

        assert!(matches!(result, Err(HttpError::Network { .. })));
    }
}
