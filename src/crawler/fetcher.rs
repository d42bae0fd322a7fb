//! HTTP fetcher implementation
//!
//! This module handles all page requests made by the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Resolving site-relative links against the catalog base URL
//! - Turning transport failures and non-success statuses into [`FetchError`]
//!
//! There is no retry: a failed fetch fails the page's task.

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Network-level failure for one page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Cannot resolve link '{link}': {source}")]
    InvalidUrl {
        link: String,
        source: url::ParseError,
    },
}

/// Source of page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of `url`, failing on transport errors and non-2xx statuses
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Timeouts come from here
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with a shared [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

/// Resolves a link found on a catalog page against the base URL
///
/// # Examples
///
/// ```
/// use autospot_crawler::crawler::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("http://autospot.ru").unwrap();
/// let url = resolve_link(&base, "/cars/toyota/").unwrap();
/// assert_eq!(url.as_str(), "http://autospot.ru/cars/toyota/");
/// ```
pub fn resolve_link(base: &Url, link: &str) -> Result<Url, FetchError> {
    base.join(link.trim()).map_err(|source| FetchError::InvalidUrl {
        link: link.to_string(),
        source,
    })
}
