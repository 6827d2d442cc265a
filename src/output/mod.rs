//! Output module for presenting crawl results
//!
//! This module handles:
//! - Rendering a single result as (optionally colored) text
//! - Displaying crawl progress
//! - Recording crawl statistics

pub mod progress;
mod render;
pub mod stats;

pub use progress::{ProgressBar, ProgressRefresher, DEFAULT_REFRESH_INTERVAL};
pub use render::{render_result, status_color, ANSI_GREEN, ANSI_RED, ANSI_RESET, ANSI_YELLOW};
pub use stats::{print_statistics, CrawlStatistics};
