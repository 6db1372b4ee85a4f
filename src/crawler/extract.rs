//! Page metadata extraction
//!
//! The scrape engine hands each fetched page to an [`Extractor`]. The default
//! [`HtmlExtractor`] pulls the first `<title>`, the first `<h1>` and the first
//! description `<meta>` tag out of the markup.

use crate::crawler::fetcher::FetchedPage;
use scraper::{Html, Selector};
use thiserror::Error;

/// Metadata extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoData {
    /// The resolved request URL
    pub url: String,

    /// Text of the first `<title>`, or empty
    pub title: String,

    /// Text of the first `<h1>`, or empty
    pub h1: String,

    /// `content` of the first description meta tag, or empty
    pub meta_description: String,

    /// HTTP status code of the response
    pub status_code: u16,
}

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to extract from {url}: {message}")]
    Parse { url: String, message: String },
}

/// Turns a fetched page into a [`SeoData`] record
///
/// Missing elements are not errors; an error means the page could not be
/// processed at all and is dropped from the results.
pub trait Extractor: Send + Sync {
    fn extract(&self, page: &FetchedPage) -> Result<SeoData, ExtractError>;
}

/// Default [`Extractor`] built on `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, page: &FetchedPage) -> Result<SeoData, ExtractError> {
        let document = Html::parse_document(&page.body);

        let title = first_text(&document, "title", &page.url)?;
        let h1 = first_text(&document, "h1", &page.url)?;
        let meta_description =
            first_attr(&document, r#"meta[name^="description"]"#, "content", &page.url)?;

        Ok(SeoData {
            url: page.url.clone(),
            title,
            h1,
            meta_description,
            status_code: page.status_code,
        })
    }
}

fn selector(css: &str, url: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Parse {
        url: url.to_string(),
        message: format!("invalid selector '{}': {:?}", css, e),
    })
}

/// Trimmed text of the first element matching `css`
fn first_text(document: &Html, css: &str, url: &str) -> Result<String, ExtractError> {
    let selector = selector(css, url)?;

    Ok(document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default())
}

/// Trimmed `attr` of the first element matching `css`
fn first_attr(document: &Html, css: &str, attr: &str, url: &str) -> Result<String, ExtractError> {
    let selector = selector(css, url)?;

    Ok(document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default())
}
