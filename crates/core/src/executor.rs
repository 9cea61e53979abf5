//! Bounded worker pool for blocking provider calls.
//!
//! Units of work run on tokio's blocking thread pool, gated by a semaphore
//! with `max_workers` permits. Submitting never blocks: a unit that finds no
//! free permit waits inside its own task. Awaiting a unit is bounded by the
//! pool timeout; the clock starts when the caller begins waiting, so time
//! spent queued for a permit counts against it. A unit that times out is
//! abandoned, not cancelled: it keeps its permit until the blocking call
//! returns.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::warn;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::errors::ExecutorError;

/// Shared bounded executor, sized once from configuration.
#[derive(Debug, Clone)]
pub struct BoundedExecutor {
    permits: Arc<Semaphore>,
    timeout: Duration,
}

/// Awaitable result of a submitted unit of work.
#[must_use = "a submitted unit of work does nothing useful unless awaited"]
pub struct TaskHandle<T> {
    inner: JoinHandle<Result<T, ExecutorError>>,
    timeout: Duration,
}

impl BoundedExecutor {
    /// Create a pool running at most `max_workers` units at once, each
    /// awaited for at most `timeout`. A pool size of zero is raised to one.
    pub fn new(max_workers: usize, timeout: Duration) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_workers)),
            timeout,
        }
    }

    /// Queue a blocking unit of work. Must be called from within a tokio runtime.
    pub fn submit<F, T>(&self, work: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permits = self.permits.clone();
        let inner = tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| ExecutorError::Closed)?;
            tokio::task::spawn_blocking(work)
                .await
                .map_err(|e| ExecutorError::Aborted(e.to_string()))
        });

        TaskHandle {
            inner,
            timeout: self.timeout,
        }
    }

    /// Submit one unit of work and wait for it.
    pub async fn run<F, T>(&self, work: F) -> Result<T, ExecutorError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit(work).wait().await
    }
}

impl<T> TaskHandle<T> {
    /// Wait for the unit to finish, up to the pool timeout.
    pub async fn wait(self) -> Result<T, ExecutorError> {
        match tokio::time::timeout(self.timeout, self.inner).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ExecutorError::Aborted(join_error.to_string())),
            Err(_) => {
                warn!("Unit of work abandoned after {:?}", self.timeout);
                Err(ExecutorError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[tokio::test]
    async fn test_run_returns_value() {
        let executor = BoundedExecutor::new(2, Duration::from_secs(5));
        let value = executor.run(|| 40 + 2).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_slow_unit_times_out() {
        let executor = BoundedExecutor::new(2, Duration::from_millis(50));
        let result = executor
            .run(|| {
                std::thread::sleep(Duration::from_millis(300));
                "late"
            })
            .await;
        assert_eq!(result, Err(ExecutorError::Timeout(Duration::from_millis(50))));
    }

    #[tokio::test]
    async fn test_panicking_unit_is_aborted() {
        let executor = BoundedExecutor::new(1, Duration::from_secs(5));
        let result: Result<(), _> = executor.run(|| panic!("provider exploded")).await;
        assert!(matches!(result, Err(ExecutorError::Aborted(_))));

        // The permit is released after the panic.
        assert_eq!(executor.run(|| 1).await, Ok(1));
    }

    #[tokio::test]
    async fn test_handles_keep_submission_order_and_failures() {
        let executor = BoundedExecutor::new(3, Duration::from_millis(200));
        let units: Vec<Box<dyn FnOnce() -> u64 + Send>> = vec![
            Box::new(|| {
                std::thread::sleep(Duration::from_millis(40));
                1
            }),
            Box::new(|| {
                std::thread::sleep(Duration::from_millis(600));
                2
            }),
            Box::new(|| 3),
        ];

        let handles: Vec<_> = units.into_iter().map(|work| executor.submit(work)).collect();
        let results = join_all(handles.into_iter().map(TaskHandle::wait)).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Ok(1));
        assert!(matches!(results[1], Err(ExecutorError::Timeout(_))));
        assert_eq!(results[2], Ok(3));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_parallelism_is_bounded() {
        let executor = BoundedExecutor::new(2, Duration::from_secs(5));
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let units: Vec<_> = (0..6)
            .map(|_| {
                let running = running.clone();
                let peak = peak.clone();
                move || {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(30));
                    running.fetch_sub(1, Ordering::SeqCst);
                }
            })
            .collect();

        let started = Instant::now();
        let handles: Vec<_> = units.into_iter().map(|work| executor.submit(work)).collect();
        let results = join_all(handles.into_iter().map(TaskHandle::wait)).await;
        assert!(results.iter().all(|r| r.is_ok()));
        assert!(peak.load(Ordering::SeqCst) <= 2);
        // Six 30ms units on two workers need at least three rounds.
        assert!(started.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_zero_workers_is_raised_to_one() {
        let executor = BoundedExecutor::new(0, Duration::from_secs(1));
        assert_eq!(executor.permits.available_permits(), 1);
        assert_eq!(executor.run(|| "ok").await, Ok("ok"));
    }
}
