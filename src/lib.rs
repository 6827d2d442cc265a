//! Linkchecker: a concurrent broken-link crawler
//!
//! This crate crawls a single website from a seed URL, follows internal links
//! recursively, and reports the HTTP status of every link it discovers
//! (internal and external) on a stream of results.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for linkchecker operations
#[derive(Debug, Error)]
pub enum LinkCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTML parse error: {message}")]
    HtmlParse { message: String },

    #[error("This checker has already run a crawl; create a new one for each site")]
    AlreadyChecked,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL {url}: {source}")]
    Parse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Missing domain in URL: {0}")]
    MissingDomain(String),
}

/// Result type alias for linkchecker operations
pub type Result<T> = std::result::Result<T, LinkCheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CheckSpeed, CheckerConfig};
pub use crawler::{check_site_links, LinkChecker, ResultStream};
pub use state::{CheckResult, CrawlState, Status};
