//! HTTP fetcher implementation
//!
//! This module handles every outbound request of a crawl:
//! - Building the HTTP client with compression support
//! - Rotating the `User-Agent` header across a configured pool
//! - Applying a fixed per-request timeout
//! - Classifying transport failures
//!
//! HTTP status codes are never treated as failures here. A 404 or 500 is a
//! successful fetch whose status is passed on to extraction.

use crate::config::{UserAgentConfig, DEFAULT_USER_AGENTS};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// A fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Response body, decoded as text
    pub body: String,
}

/// Transport-level fetch failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    fn classify(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            FetchError::Timeout { url }
        } else if source.is_connect() {
            FetchError::Connect { url, source }
        } else {
            FetchError::Http { url, source }
        }
    }
}

/// The fetch primitive both crawl stages go through
///
/// Implementations must be shareable across tasks. Tests substitute
/// in-memory implementations to control latency and failures.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `url`, returning the page or a transport error
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// A pool of client identity strings with one generator seeded at construction
pub struct UserAgentPool {
    agents: Vec<String>,
    rng: Mutex<StdRng>,
}

impl UserAgentPool {
    /// Creates a pool from configuration
    ///
    /// An empty configured pool falls back to the built-in browser strings.
    pub fn new(config: &UserAgentConfig) -> Self {
        let agents = if config.pool.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
        } else {
            config.pool.clone()
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            agents,
            rng: Mutex::new(rng),
        }
    }

    /// Picks the identity string for the next request
    pub fn pick(&self) -> &str {
        let index = {
            // A poisoned lock still holds a usable generator
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.random_range(0..self.agents.len())
        };
        &self.agents[index]
    }
}

/// Builds an HTTP client for crawling
///
/// The client decompresses gzip and brotli bodies and follows redirects with
/// reqwest's default policy. The `User-Agent` is set per request by
/// [`HttpFetcher`], not here.
///
/// # Arguments
///
/// * `timeout` - Connect timeout; the per-request timeout is applied by the fetcher
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetch`] implementation backed by reqwest
pub struct HttpFetcher {
    client: Client,
    user_agents: UserAgentPool,
    timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Ready to fetch
    /// * `Err(reqwest::Error)` - The HTTP client could not be built
    pub fn new(user_agent: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
            user_agents: UserAgentPool::new(user_agent),
            timeout,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    /// Sends one GET request and reads the body
    ///
    /// The timeout covers the whole exchange, body included.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let user_agent = self.user_agents.pick();
        tracing::debug!("GET {} (User-Agent: {})", url, user_agent);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::classify(url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(FetchedPage {
            url: final_url,
            status_code,
            body,
        })
    }
}
