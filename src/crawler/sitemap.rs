//! Sitemap discovery
//!
//! Walks a tree of sitemap documents and collects the page URLs it references.
//!
//! Every `<loc>` element in a fetched document is a reference, whether the
//! document is a `<sitemapindex>` or a `<urlset>`. References are classified
//! by name alone: anything containing `xml` is another sitemap and is fetched
//! in turn; everything else is a page.
//!
//! Discovery fans out without a ceiling. Each sitemap URL is fetched on its
//! own task as soon as it is found.

use crate::crawler::fetcher::Fetch;
use crate::crawler::worklist::{drain_worklist, Completion};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Sitemap document errors
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Malformed sitemap XML at byte {position}: {source}")]
    Xml {
        position: usize,
        source: quick_xml::Error,
    },
}

/// What a referenced URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlKind {
    /// Another sitemap document to fetch and expand
    Container,
    /// A content page to scrape
    Leaf,
}

impl UrlKind {
    /// Classifies a URL by name.
    ///
    /// Case-sensitive substring match on `xml`, anywhere in the URL.
    pub fn classify(url: &str) -> Self {
        if url.contains("xml") {
            Self::Container
        } else {
            Self::Leaf
        }
    }
}

/// Extracts the text of every `<loc>` element in a document
///
/// Only elements named exactly `loc` count; prefixed names such as
/// `image:loc` are ignored. Text is trimmed and empty entries are dropped.
/// CDATA sections inside `<loc>` are accepted.
///
/// Parsing is lenient. Text with a bare `&` or an unknown entity such as
/// `&eacute;` is kept as written. A structural error stops parsing, and the
/// references collected before it are still returned.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - References in document order (possibly empty)
/// * `Err(SitemapError)` - The document is malformed before its first reference
pub fn extract_locs(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = Reader::from_str(xml);
    let mut locs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                let position = reader.buffer_position();
                if locs.is_empty() {
                    return Err(SitemapError::Xml { position, source });
                }
                tracing::warn!(
                    "Malformed sitemap XML at byte {}, keeping {} URLs read so far: {}",
                    position,
                    locs.len(),
                    source
                );
                break;
            }
        };

        match event {
            Event::Start(e) if e.name().as_ref() == b"loc" => {
                current = Some(String::new());
            }
            Event::Text(text) => {
                if let Some(buf) = current.as_mut() {
                    match text.unescape() {
                        Ok(unescaped) => buf.push_str(&unescaped),
                        Err(e) => {
                            tracing::debug!("Keeping raw <loc> text: {}", e);
                            buf.push_str(&String::from_utf8_lossy(&text));
                        }
                    }
                }
            }
            Event::CData(data) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(e) if e.name().as_ref() == b"loc" => {
                if let Some(buf) = current.take() {
                    let loc = buf.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(locs)
}

/// Splits references into `(containers, leaves)`, keeping order and duplicates
pub fn partition_urls(urls: Vec<String>) -> (Vec<String>, Vec<String>) {
    urls.into_iter()
        .partition(|url| UrlKind::classify(url) == UrlKind::Container)
}

/// Discovers every page URL reachable from `root_url`
///
/// # Arguments
///
/// * `fetcher` - Fetch primitive used for every sitemap document
/// * `root_url` - The root sitemap
/// * `skip_revisited` - Dispatch each sitemap URL at most once. Without it a
///   cycle between sitemaps keeps the walk going forever.
///
/// # Returns
///
/// Page URLs from all reachable sitemaps, in no particular order. A page
/// listed by several sitemaps appears once per listing. Sitemaps that fail to
/// fetch or parse are logged and skipped.
pub async fn discover(fetcher: Arc<dyn Fetch>, root_url: &str, skip_revisited: bool) -> Vec<String> {
    tracing::info!("Discovering pages from sitemap {}", root_url);

    let mut dispatched: HashSet<String> = HashSet::new();
    let admit = |url: &String| {
        if url.is_empty() {
            return false;
        }
        if skip_revisited && !dispatched.insert(url.clone()) {
            tracing::debug!("Skipping already visited sitemap {}", url);
            return false;
        }
        true
    };

    let leaves = drain_worklist(vec![root_url.to_string()], admit, |url: String| {
        let fetcher = Arc::clone(&fetcher);
        async move { expand_sitemap(fetcher.as_ref(), &url).await }
    })
    .await;

    tracing::info!("Discovered {} page URLs", leaves.len());
    leaves
}

/// Fetches one sitemap and splits its references into follow-up work and pages
async fn expand_sitemap(fetcher: &dyn Fetch, url: &str) -> Completion<String, String> {
    let page = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Sitemap request failed: {}", e);
            return Completion::empty();
        }
    };

    let locs = match extract_locs(&page.body) {
        Ok(locs) => locs,
        Err(e) => {
            tracing::warn!("Error extracting URLs from {}: {}", url, e);
            return Completion::empty();
        }
    };

    let (sitemaps, pages) = partition_urls(locs);
    for sitemap in &sitemaps {
        tracing::debug!("Found sitemap {}", sitemap);
    }
    tracing::debug!(
        "{}: {} sitemaps, {} pages",
        url,
        sitemaps.len(),
        pages.len()
    );

    Completion {
        batch: sitemaps,
        results: pages,
    }
}
