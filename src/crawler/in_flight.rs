//! Outstanding-task counter used to detect crawl completion

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts crawl tasks that have been dispatched but not yet completed
///
/// A task is counted from the moment its parent calls [`InFlight::enter`]
/// until the returned guard is dropped. Because a task always enters its
/// children before its own guard drops, the count only reaches zero once the
/// whole crawl tree has finished.
#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

/// Keeps one task counted while alive
#[derive(Debug)]
pub struct InFlightGuard {
    tracker: Arc<InFlight>,
}

impl InFlight {
    /// Creates a tracker with nothing in flight
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Counts one more task; the task stays counted until the guard drops
    pub fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Number of tasks currently in flight
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Waits until no tasks are in flight
    pub async fn wait_idle(&self) {
        loop {
            // Register before checking so a wakeup between the check and the
            // await is not lost.
            let notified = self.idle.notified();
            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn leave(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tracker.leave();
    }
}
