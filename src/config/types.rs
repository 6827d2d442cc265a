use crate::config::speed::{CheckSpeed, SpeedLimits};
use serde::Deserialize;
use std::time::Duration;

/// Default capacity of the result stream
pub const DEFAULT_BUFFER_SIZE: usize = 2000;

/// Default per-request timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("linkchecker/", env!("CARGO_PKG_VERSION"));

/// Main configuration structure for linkchecker
///
/// Every field has a default, so an empty TOML file (or `CheckerConfig::default()`)
/// is a valid configuration. The `with_*` methods set one option each.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckerConfig {
    #[serde(default)]
    pub checker: CheckerSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckerSettings {
    /// Named speed preset (ignored when rate and burst are both set)
    pub speed: Option<CheckSpeed>,

    /// Explicit request rate in requests per second
    #[serde(rename = "rate-per-second")]
    pub rate_per_second: Option<f64>,

    /// Explicit burst capacity
    pub burst: Option<u32>,

    /// Capacity of the result stream
    #[serde(rename = "buffer-size")]
    pub buffer_size: usize,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Include Up results in the output, not just failures
    pub verbose: bool,

    /// Suppress the error log
    pub silent: bool,

    /// Show a progress indicator while crawling
    pub progress: bool,
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            speed: None,
            rate_per_second: None,
            burst: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verbose: false,
            silent: false,
            progress: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File to write results to (stdout when unset)
    #[serde(rename = "results-path")]
    pub results_path: Option<String>,

    /// File to write the error log to (stderr when unset)
    #[serde(rename = "error-log-path")]
    pub error_log_path: Option<String>,

    /// Disable ANSI colors in rendered results
    #[serde(rename = "no-color")]
    pub no_color: bool,
}

impl CheckerConfig {
    /// Returns the effective rate/burst pair
    ///
    /// An explicit rate and burst take precedence over the speed preset;
    /// with neither set the `normal` preset applies.
    pub fn rate_limits(&self) -> SpeedLimits {
        match (self.checker.rate_per_second, self.checker.burst) {
            (Some(rate_per_second), Some(burst)) => SpeedLimits {
                rate_per_second,
                burst,
            },
            _ => self.checker.speed.unwrap_or_default().limits(),
        }
    }

    /// Returns the per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.checker.request_timeout_ms)
    }

    /// Uses a named speed preset, clearing any explicit rate/burst
    pub fn with_speed(mut self, speed: CheckSpeed) -> Self {
        self.checker.speed = Some(speed);
        self.checker.rate_per_second = None;
        self.checker.burst = None;
        self
    }

    /// Uses an explicit rate/burst pair
    pub fn with_rate_limit(mut self, rate_per_second: f64, burst: u32) -> Self {
        self.checker.rate_per_second = Some(rate_per_second);
        self.checker.burst = Some(burst);
        self
    }

    /// Sets the capacity of the result stream
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.checker.buffer_size = size;
        self
    }

    /// Sets the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.checker.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.checker.user_agent = user_agent.into();
        self
    }

    /// Includes Up results in collected output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.checker.verbose = verbose;
        self
    }

    /// Suppresses the error log
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.checker.silent = silent;
        self
    }

    /// Enables the progress indicator
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.checker.progress = progress;
        self
    }

    /// Writes results to a file instead of stdout
    pub fn with_results_path(mut self, path: impl Into<String>) -> Self {
        self.output.results_path = Some(path.into());
        self
    }

    /// Writes the error log to a file instead of stderr
    pub fn with_error_log_path(mut self, path: impl Into<String>) -> Self {
        self.output.error_log_path = Some(path.into());
        self
    }
}
