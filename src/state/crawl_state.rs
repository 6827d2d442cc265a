use crate::url::authority;
use url::Url;

/// Scheme and domain of the crawl root
///
/// Established once from the seed URL and then read by every crawl task to
/// resolve relative links and to tell internal links from external ones.
/// Both fields stay empty when the seed could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlState {
    /// Scheme of the root URL (`https` or `http`)
    pub scheme: String,

    /// Authority of the root URL (`host` or `host:port`)
    pub domain: String,
}

impl CrawlState {
    /// Creates a crawl state from a scheme and domain
    pub fn new(scheme: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            domain: domain.into(),
        }
    }

    /// Returns true once the scheme and domain are known
    pub fn is_resolved(&self) -> bool {
        !self.scheme.is_empty() && !self.domain.is_empty()
    }

    /// The root URL, `scheme://domain`, without a trailing slash
    pub fn root_url(&self) -> String {
        format!("{}://{}", self.scheme, self.domain)
    }

    /// Returns true if `url` lives on the crawl root's domain
    pub fn is_internal(&self, url: &Url) -> bool {
        self.is_resolved() && authority(url).as_deref() == Some(self.domain.as_str())
    }
}
