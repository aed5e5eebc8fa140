//! Cancellable delayed jobs.
//!
//! A [`Debouncer`] holds at most one pending job. Scheduling a new job
//! aborts the pending one and restarts the quiet interval, so a burst of
//! events results in a single run after the burst ends.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Default)]
struct DebounceState {
    /// Bumped on every schedule and cancel; a job only runs if its
    /// generation is still current.
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

/// Runs the most recently scheduled job once the delay has passed without
/// a newer schedule.
///
/// Scheduled jobs run on tokio's blocking pool. [`Debouncer::run_now`] runs
/// its job on the calling thread. Must be used from within a tokio runtime.
pub struct Debouncer {
    delay: Duration,
    state: Arc<Mutex<DebounceState>>,
}

fn lock(state: &Mutex<DebounceState>) -> MutexGuard<'_, DebounceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(DebounceState::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending job with `job`, to run after the delay.
    pub fn schedule<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = lock(&self.state);
        state.generation += 1;
        let generation = state.generation;
        if let Some(handle) = state.handle.take() {
            handle.abort();
        }

        let shared = self.state.clone();
        let delay = self.delay;
        state.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Jobs may do file I/O, so they run on the blocking pool.
            let result = tokio::task::spawn_blocking(move || {
                let mut state = lock(&shared);
                if state.generation != generation {
                    return;
                }
                state.handle = None;
                // Runs under the lock so it cannot interleave with run_now().
                job();
            })
            .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Debounced job failed");
            }
        }));
    }

    /// Drop the pending job. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut state = lock(&self.state);
        state.generation += 1;
        match state.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel the pending job and run `job` immediately.
    pub fn run_now<F, R>(&self, job: F) -> R
    where
        F: FnOnce() -> R,
    {
        let mut state = lock(&self.state);
        state.generation += 1;
        if let Some(handle) = state.handle.take() {
            handle.abort();
        }
        job()
    }

    /// Whether a job is waiting for its delay to pass.
    pub fn is_pending(&self) -> bool {
        lock(&self.state).handle.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
