//! HTML parser for extracting links
//!
//! Link extraction sits behind the [`LinkExtractor`] trait so callers can
//! plug in a different parser. The default, [`HtmlLinkExtractor`], returns
//! the raw `href` of every `<a>` element; resolving and filtering those
//! values is left to the crawl engine.

use crate::LinkCheckError;
use scraper::{Html, Selector};

/// Extracts raw link targets from a page body
pub trait LinkExtractor: Send + Sync {
    /// Returns every link target in document order, duplicates included
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Raw href values, untrimmed and unresolved
    /// * `Err(LinkCheckError)` - The body could not be parsed
    fn extract(&self, body: &str) -> Result<Vec<String>, LinkCheckError>;
}

/// Anchor-tag extractor backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, body: &str) -> Result<Vec<String>, LinkCheckError> {
        extract_hrefs(body)
    }
}

/// Extracts the href of every `<a href="...">` element in the document
///
/// The HTML5 parser is lenient, so malformed markup still yields whatever
/// anchors it can recover.
///
/// # Example
///
/// ```no_run
/// use linkchecker::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let hrefs = extract_hrefs(html).unwrap();
/// assert_eq!(hrefs, vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Result<Vec<String>, LinkCheckError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").map_err(|e| LinkCheckError::HtmlParse {
        message: e.to_string(),
    })?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect())
}
