//! URL canonicalization for the crawl root and for discovered links
//!
//! Every URL the engine dispatches goes through here first, so the string
//! produced is also the key used for visited tracking.

use crate::crawler::Fetcher;
use crate::state::CrawlState;
use crate::url::authority;
use crate::UrlError;
use url::{ParseError, Url};

/// Schemes tried, in order, when the seed has none
const PROBE_SCHEMES: &[&str] = &["https", "http"];

/// Strips every leading `/` from a path
///
/// # Examples
///
/// ```
/// use linkchecker::url::remove_leading_slash;
///
/// assert_eq!(remove_leading_slash("///about"), "about");
/// ```
pub fn remove_leading_slash(site: &str) -> String {
    site.trim_start_matches('/').to_string()
}

/// Returns the key a URL is deduplicated under
///
/// The emitted URL keeps its canonical spelling, but `http://host`,
/// `http://host/` and `HTTP://Host/` all name the same page, so the visited
/// set is keyed on the parsed serialization. A string that does not parse is
/// its own key.
///
/// # Examples
///
/// ```
/// use linkchecker::url::visit_key;
///
/// assert_eq!(visit_key("https://example.com"), visit_key("https://example.com/"));
/// ```
pub fn visit_key(url: &str) -> String {
    Url::parse(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

/// Returns true if `seed` starts with `scheme://`
///
/// Only the part before the first `/`, `?` or `#` counts, so a bare host with
/// a URL in its query string (`example.com/?next=http://x`) has no scheme.
fn has_scheme(seed: &str) -> bool {
    let Some(end) = seed.find("://") else {
        return false;
    };
    let scheme = &seed[..end];
    !scheme.is_empty() && !scheme.contains(['/', '?', '#'])
}

/// Canonicalizes the seed URL and establishes the crawl state
///
/// A seed with an explicit scheme is used as-is and the scheme and domain are
/// read from it. A bare seed (`example.com`) is probed with a HEAD request as
/// `https://` and then `http://`; the first candidate answering 200 wins.
/// When neither answers, the `http://` candidate is returned with an
/// unresolved [`CrawlState`] and the crawl fails on its first fetch.
///
/// # Returns
///
/// * `Ok((String, CrawlState))` - The root URL and the state derived from it
/// * `Err(UrlError)` - The seed has a scheme but is not a valid URL
pub async fn canonicalise_root(
    fetcher: &Fetcher,
    seed: &str,
) -> Result<(String, CrawlState), UrlError> {
    let seed = seed.trim();

    if has_scheme(seed) {
        let url = Url::parse(seed).map_err(|source| UrlError::Parse {
            url: seed.to_string(),
            source,
        })?;
        let domain = authority(&url).ok_or_else(|| UrlError::MissingDomain(seed.to_string()))?;
        return Ok((seed.to_string(), CrawlState::new(url.scheme(), domain)));
    }

    let mut candidate = String::new();
    for scheme in PROBE_SCHEMES {
        candidate = format!("{}://{}", scheme, seed);

        match fetcher.head_status(&candidate).await {
            Ok(200) => {
                if let Ok(url) = Url::parse(&candidate) {
                    if let Some(domain) = authority(&url) {
                        tracing::debug!("Resolved seed {} to {}", seed, candidate);
                        return Ok((candidate, CrawlState::new(*scheme, domain)));
                    }
                }
                tracing::warn!("Unable to parse probed url {}", candidate);
            }
            Ok(code) => {
                tracing::debug!("Probe of {} answered {}", candidate, code);
            }
            Err(e) => {
                tracing::warn!("Unable to use {} scheme for {}: {}", scheme, seed, e);
            }
        }
    }

    Ok((candidate, CrawlState::default()))
}

/// Canonicalizes a link discovered on a page of the crawl
///
/// # Rules
///
/// | Input | Output |
/// |-------|--------|
/// | `./` | `scheme://domain` |
/// | `/path`, `///path` | `scheme://domain/path` |
/// | `path` (no scheme or host) | `scheme://domain/path` |
/// | `https://other.com/page` | unchanged |
///
/// Relative links resolve against the site root, not the directory of the
/// page they were found on.
///
/// # Examples
///
/// ```
/// use linkchecker::state::CrawlState;
/// use linkchecker::url::canonicalise_child;
///
/// let root = CrawlState::new("https", "example.com");
/// assert_eq!(canonicalise_child("./", &root).unwrap(), "https://example.com");
/// assert_eq!(canonicalise_child("about", &root).unwrap(), "https://example.com/about");
/// ```
pub fn canonicalise_child(raw: &str, root: &CrawlState) -> Result<String, UrlError> {
    let trimmed = raw.trim();

    if trimmed == "./" {
        return Ok(root.root_url());
    }

    let candidate = if trimmed.starts_with('/') {
        remove_leading_slash(trimmed)
    } else {
        trimmed.to_string()
    };

    match Url::parse(&candidate) {
        Ok(url) if url.has_host() => Ok(candidate),
        Ok(_) => Err(UrlError::MissingDomain(candidate)),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let absolute = format!("{}://{}/{}", root.scheme, root.domain, candidate);
            match Url::parse(&absolute) {
                Ok(_) => Ok(absolute),
                Err(source) => Err(UrlError::Parse {
                    url: absolute,
                    source,
                }),
            }
        }
        Err(source) => Err(UrlError::Parse {
            url: candidate,
            source,
        }),
    }
}
