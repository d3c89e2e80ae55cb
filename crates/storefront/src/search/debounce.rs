//! Cancellable delayed task.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs at most one task at a time, after a fixed delay.
///
/// Scheduling a new task aborts the pending one, whether it is still waiting
/// out the delay or already running. Dropping the debouncer aborts it too.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` once the delay elapses, replacing any pending task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Abort the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Returns `true` while a task is scheduled or running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const DELAY: Duration = Duration::from_millis(30);

    #[tokio::test]
    async fn test_last_scheduled_task_wins() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(DELAY);

        for i in 1..=5 {
            let fired = Arc::clone(&fired);
            debouncer.schedule(async move {
                fired.store(i, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(DELAY * 4).await;

        assert_eq!(fired.load(Ordering::SeqCst), 5);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_nothing_fires_before_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_secs(60));

        let counter = Arc::clone(&fired);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(DELAY).await;
        assert!(debouncer.is_pending());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drop_cancels_pending_task() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let mut debouncer = Debouncer::new(DELAY);
            let counter = Arc::clone(&fired);
            debouncer.schedule(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(DELAY * 4).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
