//! Link status definitions and HTTP status classification
//!
//! This module defines the outcome a checked link can end up in, and the
//! table mapping an HTTP response code to that outcome.

use std::fmt;

/// Non-standard code some services answer with when they detect a crawler
pub const STATUS_BOT_BLOCKED: u16 = 999;

/// Problem text for an HTTP 429 response
pub const PROBLEM_RATE_LIMITED: &str = "Site rate limit exceeded";

/// Problem text for any other non-success response
pub const PROBLEM_NON_OK: &str = "Non OK response";

/// Problem text for a request that hit the client timeout
pub const PROBLEM_TIMEOUT: &str = "Client.Timeout exceeded while awaiting headers";

/// Problem text for LinkedIn answering 999
pub const PROBLEM_LINKEDIN: &str = "linkedin is up, but rejects http requests";

/// Problem text for a 999 from any other service
pub const PROBLEM_NON_STANDARD: &str = "Non standard error returned by external service";

/// Represents the outcome of checking a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Status {
    /// Link has not been checked
    #[default]
    Unvisited,

    /// Link answered with a success code
    Up,

    /// Link is broken (non-success response, DNS failure, refused connection, bad URL)
    Down,

    /// Link answered 429 or the request timed out
    RateLimited,

    /// Link answered with a non-standard code we cannot interpret
    NonStandard,
}

impl Status {
    /// Returns true if the link is considered reachable
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Human readable label used in rendered output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unvisited => "Unvisited",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::RateLimited => "RateLimited",
            Self::NonStandard => "Unable to verify",
        }
    }

    /// Returns all statuses in display order
    pub fn all() -> [Self; 5] {
        [
            Self::Up,
            Self::Down,
            Self::RateLimited,
            Self::NonStandard,
            Self::Unvisited,
        ]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps an HTTP response code to a status and an optional problem description
///
/// | Code | Status |
/// |------|--------|
/// | 200, 201, 202 | Up |
/// | 429 | RateLimited |
/// | 999 from a linkedin.com host | Up |
/// | 999 from any other host | NonStandard |
/// | anything else | Down |
///
/// The 999 rule is a host heuristic: LinkedIn answers 999 to anything it
/// believes is a bot, so the page is reachable even though the code says
/// otherwise. It will go stale if LinkedIn changes its behavior.
pub fn classify_status(code: u16, host: &str) -> (Status, Option<&'static str>) {
    match code {
        200 | 201 | 202 => (Status::Up, None),
        429 => (Status::RateLimited, Some(PROBLEM_RATE_LIMITED)),
        STATUS_BOT_BLOCKED if is_linkedin_host(host) => (Status::Up, Some(PROBLEM_LINKEDIN)),
        STATUS_BOT_BLOCKED => (Status::NonStandard, Some(PROBLEM_NON_STANDARD)),
        _ => (Status::Down, Some(PROBLEM_NON_OK)),
    }
}

fn is_linkedin_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "linkedin.com" || host.ends_with(".linkedin.com")
}
