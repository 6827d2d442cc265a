//! Progress indicator for a running crawl
//!
//! The crawl engine reports every scheduled task with [`ProgressBar::add`]
//! and every started task with [`ProgressBar::completed`]. The bar itself
//! knows nothing about crawling; a [`ProgressRefresher`] redraws it on a
//! fixed interval while the crawl runs.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Default redraw interval of a [`ProgressRefresher`]
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Shared done/total counter with a one-line text rendering
pub struct ProgressBar {
    total: AtomicU64,
    done: AtomicU64,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ProgressBar {
    /// Creates a progress bar drawing to stderr
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    /// Creates a progress bar drawing to `out`
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            total: AtomicU64::new(0),
            done: AtomicU64::new(0),
            out: Mutex::new(out),
        }
    }

    /// Adds `n` units of outstanding work
    pub fn add(&self, n: u64) {
        self.total.fetch_add(n, Ordering::SeqCst);
    }

    /// Marks one unit of work as done
    pub fn completed(&self) {
        self.done.fetch_add(1, Ordering::SeqCst);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    pub fn done(&self) -> u64 {
        self.done.load(Ordering::SeqCst)
    }

    /// Percentage of work done, 0.0 before any work was added
    pub fn percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.done() as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Formats the current state as a single carriage-return terminated line
    pub fn line(&self) -> String {
        format!(
            "{:.1}% complete        {} / {}\r",
            self.percent(),
            self.done(),
            self.total()
        )
    }

    /// Draws the current state
    pub fn render(&self) -> io::Result<()> {
        let line = self.line();
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(line.as_bytes())?;
        out.flush()
    }

    /// Starts redrawing the bar every `interval` on a background task
    pub fn spawn_refresher(self: &Arc<Self>, interval: Duration) -> ProgressRefresher {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let bar = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if let Err(e) = bar.render() {
                            tracing::debug!("Stopping progress display: {}", e);
                            return;
                        }
                    }
                }
            }

            // Leave the final state on its own line
            if let Err(e) = bar.render().and_then(|_| bar.finish_line()) {
                tracing::debug!("Failed to draw final progress: {}", e);
            }
        });

        ProgressRefresher {
            stop: Some(stop_tx),
            handle,
        }
    }

    fn finish_line(&self) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(b"\n")?;
        out.flush()
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressBar")
            .field("done", &self.done())
            .field("total", &self.total())
            .finish()
    }
}

/// Handle to a background redraw task
#[derive(Debug)]
pub struct ProgressRefresher {
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl ProgressRefresher {
    /// Stops redrawing, draws the final state, and waits for the task to exit
    pub async fn finish(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            tracing::debug!("Progress task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer that appends into a shared buffer
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_percent_starts_at_zero() {
        let bar = ProgressBar::with_writer(Box::new(io::sink()));
        assert_eq!(bar.percent(), 0.0);
    }

    #[test]
    fn test_percent_tracks_completion() {
        let bar = ProgressBar::with_writer(Box::new(io::sink()));
        bar.add(4);
        bar.completed();
        assert_eq!(bar.percent(), 25.0);

        for _ in 0..3 {
            bar.completed();
        }
        assert_eq!(bar.percent(), 100.0);
    }

    #[test]
    fn test_render_format() {
        let buf = SharedBuf::default();
        let bar = ProgressBar::with_writer(Box::new(buf.clone()));
        bar.add(3);
        bar.completed();
        bar.render().unwrap();

        assert_eq!(buf.contents(), "33.3% complete        1 / 3\r");
    }

    #[tokio::test]
    async fn test_refresher_draws_final_state() {
        let buf = SharedBuf::default();
        let bar = Arc::new(ProgressBar::with_writer(Box::new(buf.clone())));
        bar.add(2);

        let refresher = bar.spawn_refresher(Duration::from_millis(10));
        bar.completed();
        bar.completed();
        refresher.finish().await;

        let contents = buf.contents();
        assert!(contents.ends_with("100.0% complete        2 / 2\r\n"));
    }
}
