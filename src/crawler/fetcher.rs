//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with a proper user agent string
//! - The single cooldown-then-retry on HTTP 429
//! - Error classification into `FetchError`

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors that end the processing of a single page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success status, after the rate-limit retry when one applied
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Connection, TLS, DNS or timeout failure
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read as text
    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Returns true if the page was still rate limited after the retry
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS.as_u16())
    }
}

/// Source of raw page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the raw markup at `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use hotel_scout::config::UserAgentConfig;
/// use hotel_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP(S)
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Return the body |
/// | HTTP 429 (first attempt) | Wait the cooldown, retry exactly once |
/// | HTTP 429 (retry) | `FetchError::Status` |
/// | Any other non-2xx | `FetchError::Status`, no retry |
/// | Transport failure | `FetchError::Transport`, no retry |
pub struct HttpFetcher {
    client: Client,
    cooldown: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, cooldown: Duration) -> Self {
        Self { client, cooldown }
    }

    /// Builds a fetcher with its own client from the crawler settings
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, crawler.request_timeout())?;
        Ok(Self::new(client, crawler.rate_limit_cooldown()))
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self.send(url).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(
                "Rate limited on {}. Waiting {:?} before retrying",
                url,
                self.cooldown
            );
            tokio::time::sleep(self.cooldown).await;
            response = self.send(url).await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}
