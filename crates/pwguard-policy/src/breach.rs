//! k-anonymity breach-lookup client.
//!
//! Only the first few hex characters of a password's SHA-1 digest leave the
//! process. The remote API answers with every known digest suffix in that
//! range as plain text.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use pwguard_core::config::BreachConfig;
use pwguard_core::error::{AppError, ErrorKind};

/// Failure talking to the breach API.
#[derive(Debug, thiserror::Error)]
pub enum BreachLookupError {
    /// The request could not be sent, timed out, or the body was unreadable.
    #[error("Breach lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Breach lookup returned HTTP {0}")]
    Status(u16),

    /// Lookup failed for another reason.
    #[error("Breach lookup failed: {0}")]
    Other(String),
}

/// Fetches the suffix list for a digest prefix.
#[async_trait]
pub trait BreachLookup: Send + Sync + std::fmt::Debug + 'static {
    /// Return the raw response body for `prefix`.
    async fn range(&self, prefix: &str) -> Result<String, BreachLookupError>;
}

/// HTTP implementation: `GET {base_url}/{prefix}`.
#[derive(Debug, Clone)]
pub struct HttpBreachClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBreachClient {
    /// Build a client with the configured timeout and user agent.
    pub fn new(config: &BreachConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build breach lookup client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn range_url(&self, prefix: &str) -> String {
        format!("{}/{}", self.base_url, prefix)
    }
}

#[async_trait]
impl BreachLookup for HttpBreachClient {
    async fn range(&self, prefix: &str) -> Result<String, BreachLookupError> {
        let url = self.range_url(prefix);
        debug!(url = %url, "Querying breach range");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BreachLookupError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CompromisedPasswordCheck;
    use crate::rules::RuleSet;
    use crate::validation::ValidationInput;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single HTTP request with the given status and body.
    async fn serve_once(status: &'static str, body: &'static str) -> BreachConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        BreachConfig {
            base_url: format!("http://{addr}/range"),
            timeout_seconds: 5,
            ..BreachConfig::default()
        }
    }

    #[test]
    fn test_range_url_strips_trailing_slash() {
        let config = BreachConfig {
            base_url: "https://breach.example/range/".to_string(),
            ..BreachConfig::default()
        };
        let client = HttpBreachClient::new(&config).unwrap();
        assert_eq!(client.range_url("21BD1"), "https://breach.example/range/21BD1");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let config = BreachConfig {
            base_url: "http://127.0.0.1:9/range".to_string(),
            timeout_seconds: 2,
            ..BreachConfig::default()
        };
        let client = HttpBreachClient::new(&config).unwrap();
        assert!(client.range("ABCDE").await.is_err());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let config = serve_once("503 Service Unavailable", "").await;
        let client = HttpBreachClient::new(&config).unwrap();
        assert!(matches!(
            client.range("5BAA6").await,
            Err(BreachLookupError::Status(503))
        ));
    }

    #[tokio::test]
    async fn test_error_status_fails_open_in_check() {
        let config = serve_once("503 Service Unavailable", "").await;
        let client = Arc::new(HttpBreachClient::new(&config).unwrap());
        let check = CompromisedPasswordCheck::from_rules(&RuleSet::empty(), client);

        let result = check
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;
        assert!(result.is_valid());
        assert!(result.message().is_none());
    }

    #[tokio::test]
    async fn test_success_body_is_returned() {
        let config = serve_once("200 OK", "1E4C9B93F3F0682250B6CF8331B7EE68FD8:3861493").await;
        let client = Arc::new(HttpBreachClient::new(&config).unwrap());
        let check = CompromisedPasswordCheck::from_rules(&RuleSet::empty(), client);

        let result = check
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;
        assert!(!result.is_valid());
    }
}
