//! Bounded page scraping
//!
//! Fetches every page URL and extracts a [`SeoData`] record from each one.
//! A semaphore caps how many fetches are in flight. A permit is held for the
//! network round trip only and released before extraction starts.

use crate::crawler::extract::{Extractor, SeoData};
use crate::crawler::fetcher::Fetch;
use crate::crawler::worklist::{drain_worklist, Completion};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Scrapes `urls` with at most `concurrency` fetches in flight
///
/// # Arguments
///
/// * `fetcher` - Fetch primitive for page requests
/// * `urls` - Page URLs; empty strings are skipped
/// * `extractor` - Turns each fetched page into a record
/// * `concurrency` - Fetch ceiling; values below 1 are treated as 1
///
/// # Returns
///
/// One record per page that was fetched and extracted, in completion order.
/// Pages that fail either step are logged and left out.
pub async fn scrape(
    fetcher: Arc<dyn Fetch>,
    urls: Vec<String>,
    extractor: Arc<dyn Extractor>,
    concurrency: usize,
) -> Vec<SeoData> {
    let total = urls.len();
    tracing::info!(
        "Scraping {} pages with concurrency {}",
        total,
        concurrency.max(1)
    );

    let pool = Arc::new(Semaphore::new(concurrency.max(1)));

    let records = drain_worklist(urls, |url: &String| !url.is_empty(), |url: String| {
        let fetcher = Arc::clone(&fetcher);
        let extractor = Arc::clone(&extractor);
        let pool = Arc::clone(&pool);
        async move { scrape_page(fetcher.as_ref(), &pool, extractor.as_ref(), &url).await }
    })
    .await;

    tracing::info!("Scraped {} of {} pages", records.len(), total);
    records
}

/// Fetches one page under the pool and extracts its record
async fn scrape_page(
    fetcher: &dyn Fetch,
    pool: &Semaphore,
    extractor: &dyn Extractor,
    url: &str,
) -> Completion<String, SeoData> {
    tracing::debug!("Requesting URL: {}", url);

    let fetched = {
        let _permit = match pool.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::warn!("Fetch pool closed, dropping {}: {}", url, e);
                return Completion::empty();
            }
        };
        fetcher.fetch(url).await
    };

    let page = match fetched {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Error scraping URL: {}", e);
            return Completion::empty();
        }
    };

    match extractor.extract(&page) {
        Ok(record) => Completion::result(record),
        Err(e) => {
            tracing::warn!("Error extracting {}: {}", url, e);
            Completion::empty()
        }
    }
}
