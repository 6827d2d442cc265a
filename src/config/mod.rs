//! Configuration module for linkchecker
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and the named speed presets used to configure the rate limiter.
//!
//! # Example
//!
//! ```no_run
//! use linkchecker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkchecker.toml")).unwrap();
//! println!("Crawling at {:?}", config.rate_limits());
//! ```

mod parser;
mod speed;
mod types;
mod validation;

// Re-export types
pub use speed::{CheckSpeed, SpeedLimits};
pub use types::{
    CheckerConfig, CheckerSettings, OutputConfig, DEFAULT_BUFFER_SIZE, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_USER_AGENT,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_rate_limit};
