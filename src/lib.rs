//! Sitemap-SEO: a sitemap-driven page metadata scraper
//!
//! This crate walks a tree of sitemap documents starting at a root sitemap,
//! collects every page URL it references, then fetches those pages under a
//! concurrency ceiling and extracts title, first heading, meta description
//! and HTTP status from each one.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Sitemap-SEO operations
///
/// Errors from individual URLs never surface here: the crawl engines log and
/// drop them. Only setup and presentation failures are reported.
#[derive(Debug, Error)]
pub enum SeoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sitemap-SEO operations
pub type Result<T> = std::result::Result<T, SeoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{scrape_sitemap, Crawler, Extractor, FetchedPage, HtmlExtractor, SeoData};
