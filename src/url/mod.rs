//! URL handling module for linkchecker
//!
//! This module provides canonicalization of the seed URL and of discovered
//! links, authority extraction, and the filter deciding which hrefs are worth
//! dispatching at all.

mod canonicalize;
mod domain;
mod filter;

// Re-export main functions
pub use canonicalize::{canonicalise_child, canonicalise_root, remove_leading_slash, visit_key};
pub use domain::{authority, extract_domain};
pub use filter::is_link_ok_to_add;
