//! Crawler coordinator - sequences discovery and scraping
//!
//! The [`Crawler`] owns the configuration, the fetch primitive and the
//! extractor for a run, and drives the two stages in order:
//! 1. Discover page URLs from the sitemap tree
//! 2. Scrape every discovered page under the concurrency ceiling

use crate::config::{validate, Config};
use crate::crawler::extract::{Extractor, HtmlExtractor, SeoData};
use crate::crawler::fetcher::{Fetch, HttpFetcher};
use crate::crawler::{scrape, sitemap};
use crate::SeoError;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a full crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The root sitemap the run started from
    pub root_url: String,

    /// Number of page URLs discovery produced
    pub discovered: usize,

    /// One record per successfully scraped page
    pub records: Vec<SeoData>,

    /// Wall-clock time of the whole run
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Number of discovered pages that produced no record
    pub fn dropped(&self) -> usize {
        self.discovered.saturating_sub(self.records.len())
    }
}

/// Main crawler structure
pub struct Crawler {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetch>,
    extractor: Arc<dyn Extractor>,
}

impl Crawler {
    /// Creates a crawler with the HTTP fetcher and the default HTML extractor
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(SeoError)` - The configuration is invalid or the HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, SeoError> {
        validate(&config)?;
        let timeout = Duration::from_secs(config.scraper.request_timeout_secs);
        let fetcher = HttpFetcher::new(&config.user_agent, timeout)?;

        Ok(Self::with_parts(
            config,
            Arc::new(fetcher),
            Arc::new(HtmlExtractor),
        ))
    }

    /// Creates a crawler from explicit parts
    pub fn with_parts(config: Config, fetcher: Arc<dyn Fetch>, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            extractor,
        }
    }

    /// Replaces the extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Runs discovery only, returning every page URL found
    pub async fn discover(&self) -> Vec<String> {
        sitemap::discover(
            Arc::clone(&self.fetcher),
            &self.config.sitemap.root_url,
            self.config.sitemap.skip_revisited_sitemaps,
        )
        .await
    }

    /// Runs scraping only, over the given page URLs
    pub async fn scrape(&self, urls: Vec<String>) -> Vec<SeoData> {
        scrape::scrape(
            Arc::clone(&self.fetcher),
            urls,
            Arc::clone(&self.extractor),
            self.config.scraper.concurrency,
        )
        .await
    }

    /// Runs discovery followed by scraping
    ///
    /// Individual URL failures never fail the run; a run where every fetch
    /// fails returns a report with no records.
    pub async fn run(&self) -> CrawlReport {
        let start_time = Instant::now();

        let urls = self.discover().await;
        let discovered = urls.len();
        let records = self.scrape(urls).await;

        let report = CrawlReport {
            root_url: self.config.sitemap.root_url.clone(),
            discovered,
            records,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} records from {} discovered pages in {:?}",
            report.records.len(),
            report.discovered,
            report.elapsed
        );

        report
    }
}

/// Discovers and scrapes every page under a root sitemap
///
/// # Arguments
///
/// * `config` - Root URL, concurrency ceiling and fetch settings
/// * `extractor` - Extraction implementation applied to each page
///
/// # Returns
///
/// * `Ok(Vec<SeoData>)` - Records for every page scraped, in no particular order
/// * `Err(SeoError)` - The configuration is invalid or the HTTP client could not be built
///
/// # Example
///
/// ```no_run
/// use sitemap_seo::{scrape_sitemap, Config, HtmlExtractor};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::new("https://example.com/sitemap.xml");
/// let records = scrape_sitemap(config, Arc::new(HtmlExtractor)).await?;
/// for record in records {
///     println!("{} {}", record.status_code, record.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn scrape_sitemap(
    config: Config,
    extractor: Arc<dyn Extractor>,
) -> Result<Vec<SeoData>, SeoError> {
    let crawler = Crawler::new(config)?.with_extractor(extractor);
    Ok(crawler.run().await.records)
}
