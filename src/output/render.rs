//! Text rendering of a single check result

use crate::state::{CheckResult, Status};

pub const ANSI_RESET: &str = "\x1b[0m";
pub const ANSI_RED: &str = "\x1b[31m";
pub const ANSI_GREEN: &str = "\x1b[32m";
pub const ANSI_YELLOW: &str = "\x1b[33m";

/// Color used to render a result with `status`, if any
pub fn status_color(status: Status) -> Option<&'static str> {
    match status {
        Status::Up => Some(ANSI_GREEN),
        Status::Down => Some(ANSI_RED),
        Status::RateLimited | Status::NonStandard => Some(ANSI_YELLOW),
        Status::Unvisited => None,
    }
}

/// Renders a result as a multi-line block
///
/// With `color` set the block is wrapped in the ANSI color of its status.
///
/// # Example
///
/// ```
/// use linkchecker::output::render_result;
/// use linkchecker::CheckResult;
///
/// let result = CheckResult::new("https://example.com", "https://example.com").up(200);
/// let text = render_result(&result, false);
/// assert!(text.starts_with("URL: https://example.com\nStatus: Up\n"));
/// ```
pub fn render_result(result: &CheckResult, color: bool) -> String {
    match status_color(result.status) {
        Some(ansi) if color => format!("{}{}{}", ansi, result, ANSI_RESET),
        _ => result.to_string(),
    }
}
