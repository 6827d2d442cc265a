//! Crawler module for link checking
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeout classification
//! - HTML link extraction
//! - Request pacing through a shared rate limiter
//! - Concurrent deduplication of visited URLs
//! - Overall crawl coordination and the result stream

mod coordinator;
mod fetcher;
mod in_flight;
mod limiter;
mod parser;
mod stream;
mod visited;

pub use coordinator::{check_site_links, LinkChecker};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use in_flight::{InFlight, InFlightGuard};
pub use limiter::{LimiterError, RateLimiter};
pub use parser::{extract_hrefs, HtmlLinkExtractor, LinkExtractor};
pub use stream::ResultStream;
pub use visited::VisitedSet;
