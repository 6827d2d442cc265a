//! State module for crawl outcomes
//!
//! This module provides the data model shared by the crawl engine and its
//! consumers.
//!
//! # Components
//!
//! - `Status`: The outcome classification of a checked link
//! - `CheckResult`: The record emitted once per crawled URL
//! - `CrawlState`: The scheme and domain established from the seed URL

mod check_result;
mod crawl_state;
pub mod status;

// Re-export main types
pub use check_result::CheckResult;
pub use crawl_state::CrawlState;
pub use status::{classify_status, Status};
