//! Result stream handed to the caller of a crawl

use crate::state::CheckResult;
use tokio::sync::mpsc;

/// Creates the bounded channel behind a [`ResultStream`]
///
/// A capacity of zero is raised to one, the smallest capacity tokio accepts.
pub(crate) fn channel(
    capacity: usize,
    verbose: bool,
) -> (mpsc::Sender<CheckResult>, ResultStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, ResultStream { rx, verbose })
}

/// Receiving end of a crawl's results
///
/// Results arrive in completion order. The stream ends once the crawl has
/// finished and every sender has been dropped.
#[derive(Debug)]
pub struct ResultStream {
    rx: mpsc::Receiver<CheckResult>,
    verbose: bool,
}

impl ResultStream {
    /// Receives the next result, or `None` once the crawl is complete
    pub async fn recv(&mut self) -> Option<CheckResult> {
        self.rx.recv().await
    }

    /// Drains the stream and returns the results sorted by URL
    ///
    /// Up results are dropped unless the crawl was configured as verbose.
    pub async fn collect_all(mut self) -> Vec<CheckResult> {
        let mut results = Vec::new();

        while let Some(result) = self.rx.recv().await {
            if self.verbose || !result.is_up() {
                results.push(result);
            }
        }

        results.sort_by(|a, b| a.url.cmp(&b.url));
        results
    }

    /// Returns the underlying channel receiver
    pub fn into_inner(self) -> mpsc::Receiver<CheckResult> {
        self.rx
    }
}
