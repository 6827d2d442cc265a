use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkchecker::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the authority (host plus explicit port) from a URL
///
/// Two links belong to the same site only when both host and port match,
/// so this is the value stored as the crawl domain. A port equal to the
/// scheme's default is dropped by the URL parser and does not appear here.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkchecker::url::authority;
///
/// let url = Url::parse("http://127.0.0.1:8080/about").unwrap();
/// assert_eq!(authority(&url), Some("127.0.0.1:8080".to_string()));
///
/// let url = Url::parse("https://example.com:443/").unwrap();
/// assert_eq!(authority(&url), Some("example.com".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = extract_domain(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
