//! Trailing-edge debouncing for layout saves
//!
//! Every scheduled job waits out the quiet period on its own tokio task.
//! Scheduling again bumps a generation counter; a task that wakes up to find
//! its generation superseded exits without running. There is no leading-edge
//! fire, so a burst of edits produces exactly one job, run after the last edit
//! has been quiet for the full delay.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Debouncer for persistence jobs
pub struct PersistDebouncer {
    /// Quiet period before a job runs
    delay: Duration,
    /// Generation of the most recently scheduled job
    generation: Arc<AtomicU64>,
    /// Task of the most recently scheduled job
    pending: Option<JoinHandle<()>>,
}

impl PersistDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `job` to run after the quiet period, superseding any job
    /// scheduled earlier that has not started yet.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&mut self, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = self.generation.clone();
        let delay = self.delay;

        // The previous task stays detached; it will see a stale generation.
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            job().await;
        }));
    }

    /// Drop the pending job, if any. Returns whether one was waiting.
    pub fn cancel(&mut self) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        match self.pending.take() {
            Some(handle) => !handle.is_finished(),
            None => false,
        }
    }

    /// Whether a scheduled job has not finished yet
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for PersistDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_job(counter: &Arc<AtomicUsize>, value: usize) -> impl FnOnce() -> std::future::Ready<()> {
        let counter = counter.clone();
        move || {
            counter.store(value, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_runs_after_delay() {
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = PersistDebouncer::new(Duration::from_millis(500));

        debouncer.schedule(counting_job(&last, 1));
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(last.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(last.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_only_last_job() {
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = PersistDebouncer::new(Duration::from_millis(500));

        for value in 1..=5 {
            let runs = runs.clone();
            let last = last.clone();
            debouncer.schedule(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                last.store(value, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_job() {
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = PersistDebouncer::new(Duration::from_millis(500));

        debouncer.schedule(counting_job(&last, 7));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(last.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_job() {
        let last = Arc::new(AtomicUsize::new(0));
        {
            let mut debouncer = PersistDebouncer::new(Duration::from_millis(500));
            debouncer.schedule(counting_job(&last, 3));
        }
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(last.load(Ordering::SeqCst), 0);
    }
}
