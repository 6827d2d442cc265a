//! Thread-safe record of the URLs a crawl has already dispatched

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set of canonical URLs claimed by crawl tasks
///
/// Every access goes through one mutex. [`VisitedSet::claim`] checks and
/// inserts inside a single critical section, so when several tasks discover
/// the same link at once exactly one of them wins the claim and fetches it.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a HashSet half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if `url` has already been claimed
    pub fn is_visited(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Atomically claims `url`
    ///
    /// # Returns
    ///
    /// * `true` - The caller claimed the URL and is responsible for checking it
    /// * `false` - Another task claimed it first
    pub fn claim(&self, url: &str) -> bool {
        self.lock().insert(url.to_string())
    }

    /// Marks `url` as visited; calling it again has no effect
    pub fn mark_visited(&self, url: &str) {
        self.claim(url);
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
