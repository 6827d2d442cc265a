//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured timeout
//! - HEAD requests for a cheap existence check
//! - GET requests to fetch page content
//! - Error classification (timeout vs other transport failures)

use crate::config::CheckerConfig;
use crate::state::status::PROBLEM_TIMEOUT;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::error::Error as _;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure of a request
///
/// An HTTP response with any status code is not a `FetchError`; only failing
/// to get a response at all is.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request hit the client timeout
    #[error("{}", PROBLEM_TIMEOUT)]
    Timeout { url: String },

    /// DNS failure, refused connection, TLS error, and the like
    #[error("{message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    /// Returns true if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                message: describe_error(&err),
            }
        }
    }
}

/// Renders an error with its whole source chain
///
/// reqwest keeps the interesting part (e.g. "dns error: failed to lookup
/// address information") in the sources, not in its own message.
fn describe_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `timeout` - Upper bound for every request, connect through body
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends HEAD and GET requests on behalf of crawl tasks
///
/// Cloning a `Fetcher` is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: String,
}

impl Fetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(config: &CheckerConfig) -> crate::Result<Self> {
        let client = build_http_client(config.request_timeout())?;
        Ok(Self::with_client(client, &config.checker.user_agent))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, user_agent: &str) -> Self {
        Self {
            client,
            user_agent: user_agent.to_string(),
        }
    }

    /// Sends a HEAD request and returns the response status code
    ///
    /// # Returns
    ///
    /// * `Ok(u16)` - The server answered, with any status code
    /// * `Err(FetchError)` - No response was received
    pub async fn head_status(&self, url: &str) -> Result<u16, FetchError> {
        let response = self
            .client
            .head(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "*/*")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(response.status().as_u16())
    }

    /// Sends a GET request and returns the response
    ///
    /// The body is left unread so the caller can decide whether it needs it.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        self.client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "*/*")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }

    /// Reads a response body as text
    pub async fn read_body(&self, url: &str, response: Response) -> Result<String, FetchError> {
        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_fetcher_from_default_config() {
        let fetcher = Fetcher::new(&CheckerConfig::default()).unwrap();
        assert!(fetcher.user_agent.starts_with("linkchecker/"));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = FetchError::Timeout {
            url: "https://example.com".to_string(),
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), PROBLEM_TIMEOUT);
    }

    #[test]
    fn test_transport_error_message() {
        let err = FetchError::Transport {
            url: "https://example.com".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_a_transport_error() {
        let fetcher = Fetcher::new(&CheckerConfig::default()).unwrap();
        let err = fetcher
            .head_status("https://boguswebsite.invalid/home")
            .await
            .unwrap_err();
        assert!(!err.is_timeout());
        assert!(!err.to_string().is_empty());
    }

    // Status handling against live responses is covered by the wiremock
    // integration tests
}
