use crate::state::CrawlState;
use url::Url;

/// Href prefixes that never point at a checkable web page
const SKIPPED_PREFIXES: &[&str] = &["mailto:", "ftp:", "javascript:", "tel:", "data:"];

/// Decides whether a raw href should be dispatched as a crawl task
///
/// Returns false for:
/// - empty hrefs and fragment-only (`#section`) hrefs
/// - `mailto:`, `ftp:`, `javascript:`, `tel:` and `data:` links
/// - links to `localhost`, unless the crawl root is itself on localhost
///
/// # Examples
///
/// ```
/// use linkchecker::state::CrawlState;
/// use linkchecker::url::is_link_ok_to_add;
///
/// let root = CrawlState::new("https", "example.com");
/// assert!(is_link_ok_to_add("/about", &root));
/// assert!(!is_link_ok_to_add("mailto:me@example.com", &root));
/// ```
pub fn is_link_ok_to_add(link: &str, root: &CrawlState) -> bool {
    let link = link.trim();

    if link.is_empty() || link.starts_with('#') {
        return false;
    }

    let lower = link.to_ascii_lowercase();
    if SKIPPED_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return false;
    }

    if let Ok(url) = Url::parse(link) {
        if url.host_str() == Some("localhost")
            && !root.domain.to_ascii_lowercase().starts_with("localhost")
        {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> CrawlState {
        CrawlState::new("https", "example.com")
    }

    #[test]
    fn test_accepts_page_links() {
        assert!(is_link_ok_to_add("/about", &root()));
        assert!(is_link_ok_to_add("about", &root()));
        assert!(is_link_ok_to_add("./", &root()));
        assert!(is_link_ok_to_add("https://other.com/page", &root()));
    }

    #[test]
    fn test_rejects_mailto_and_ftp() {
        assert!(!is_link_ok_to_add("mailto:test@example.com", &root()));
        assert!(!is_link_ok_to_add("MAILTO:test@example.com", &root()));
        assert!(!is_link_ok_to_add("ftp://files.example.com/a.zip", &root()));
        assert!(!is_link_ok_to_add("  ftp://files.example.com/a.zip", &root()));
    }

    #[test]
    fn test_rejects_non_navigable_links() {
        assert!(!is_link_ok_to_add("javascript:void(0)", &root()));
        assert!(!is_link_ok_to_add("tel:+1234567890", &root()));
        assert!(!is_link_ok_to_add("data:text/html,<h1>x</h1>", &root()));
        assert!(!is_link_ok_to_add("#section", &root()));
        assert!(!is_link_ok_to_add("", &root()));
        assert!(!is_link_ok_to_add("   ", &root()));
    }

    #[test]
    fn test_rejects_localhost_from_remote_site() {
        assert!(!is_link_ok_to_add("http://localhost:3000/admin", &root()));
    }

    #[test]
    fn test_accepts_localhost_when_crawling_localhost() {
        let root = CrawlState::new("http", "localhost:3000");
        assert!(is_link_ok_to_add("http://localhost:3000/admin", &root));
    }
}
