//! Statistics gathered from a crawl's results
//!
//! This module provides functionality for tallying results as they stream
//! in and for printing the summary shown at the end of a run.

use crate::state::{CheckResult, Status};
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Total number of results received
    pub total_links: u64,

    /// Count of results by status
    pub links_by_status: HashMap<Status, u64>,

    /// Number of distinct pages that referred to a failing link
    pub pages_with_problems: u64,

    /// Hosts that answered with a rate limit or timed out
    pub rate_limited_hosts: Vec<String>,

    referrers: HashSet<String>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds statistics from a finished set of results
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Self {
        let mut stats = Self::new();
        for result in results {
            stats.record(result);
        }
        stats
    }

    /// Tallies one result
    pub fn record(&mut self, result: &CheckResult) {
        self.total_links += 1;
        *self.links_by_status.entry(result.status).or_insert(0) += 1;

        if !result.is_up() && self.referrers.insert(result.referring_site.clone()) {
            self.pages_with_problems += 1;
        }

        if result.status == Status::RateLimited {
            if let Some(host) = ::url::Url::parse(&result.url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
            {
                if !self.rate_limited_hosts.contains(&host) {
                    self.rate_limited_hosts.push(host);
                }
            }
        }
    }

    /// Number of results with `status`
    pub fn count(&self, status: Status) -> u64 {
        self.links_by_status.get(&status).copied().unwrap_or(0)
    }

    /// Number of results that are not up
    pub fn problems(&self) -> u64 {
        self.total_links - self.count(Status::Up)
    }
}

/// Prints statistics in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `out` - Where to write them
pub fn print_statistics(stats: &CrawlStatistics, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "=== Link Check Statistics ===")?;
    writeln!(out)?;
    writeln!(out, "Links checked: {}", stats.total_links)?;

    for status in Status::all() {
        let count = stats.count(status);
        if count == 0 {
            continue;
        }
        let percentage = (count as f64 / stats.total_links as f64) * 100.0;
        writeln!(out, "  {}: {} ({:.1}%)", status, count, percentage)?;
    }

    if stats.problems() > 0 {
        writeln!(
            out,
            "Pages linking to problems: {}",
            stats.pages_with_problems
        )?;
    }

    if !stats.rate_limited_hosts.is_empty() {
        writeln!(
            out,
            "Rate Limited Hosts ({}):",
            stats.rate_limited_hosts.len()
        )?;
        for host in &stats.rate_limited_hosts {
            writeln!(out, "  - {}", host)?;
        }
    }

    Ok(())
}
