//! Crawler module for sitemap discovery and page scraping
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a rotating user agent
//! - Sitemap parsing and recursive discovery of page URLs
//! - Bounded-concurrency scraping of discovered pages
//! - The shared worklist drain both stages run on
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod fetcher;
pub mod scrape;
pub mod sitemap;
mod worklist;

pub use coordinator::{scrape_sitemap, CrawlReport, Crawler};
pub use extract::{ExtractError, Extractor, HtmlExtractor, SeoData};
pub use fetcher::{build_http_client, Fetch, FetchError, FetchedPage, HttpFetcher, UserAgentPool};
pub use sitemap::{discover, extract_locs, partition_urls, SitemapError, UrlKind};
pub use worklist::{drain_worklist, Completion};

