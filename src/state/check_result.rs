//! The per-link result emitted by the crawl engine

use crate::state::status::{classify_status, Status};
use std::fmt;

/// Outcome of checking one URL
///
/// Exactly one `CheckResult` is produced per crawled URL. The crawl task that
/// fetched the URL builds it and moves it into the result stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckResult {
    /// The canonical URL that was checked
    pub url: String,

    /// The page the link was found on (the seed refers to itself)
    pub referring_site: String,

    /// HTTP status code, absent when no response was received
    pub response_code: Option<u16>,

    /// Classification of the outcome
    pub status: Status,

    /// Description of what went wrong, if anything
    pub problem: Option<String>,
}

impl CheckResult {
    /// Creates an unvisited result for `url` found on `referring_site`
    pub fn new(url: impl Into<String>, referring_site: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            referring_site: referring_site.into(),
            ..Self::default()
        }
    }

    /// Marks the result as up with the given response code
    pub fn up(self, code: u16) -> Self {
        Self {
            status: Status::Up,
            response_code: Some(code),
            ..self
        }
    }

    /// Marks the result as down with a problem description
    pub fn down(self, code: Option<u16>, problem: impl Into<String>) -> Self {
        Self {
            status: Status::Down,
            response_code: code,
            problem: Some(problem.into()),
            ..self
        }
    }

    /// Marks the result as rate limited with a problem description
    pub fn rate_limited(self, code: Option<u16>, problem: impl Into<String>) -> Self {
        Self {
            status: Status::RateLimited,
            response_code: code,
            problem: Some(problem.into()),
            ..self
        }
    }

    /// Applies the response code classification for `host`
    pub fn classified(self, code: u16, host: &str) -> Self {
        let (status, problem) = classify_status(code, host);
        Self {
            status,
            response_code: Some(code),
            problem: problem.map(str::to_string),
            ..self
        }
    }

    /// Returns true if the link is up
    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self
            .response_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());

        write!(
            f,
            "URL: {}\nStatus: {}\nStatus Code: {}\nProblem: {}\nReferring URL: {}",
            self.url,
            self.status,
            code,
            self.problem.as_deref().unwrap_or(""),
            self.referring_site
        )
    }
}
