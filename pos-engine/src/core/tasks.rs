//! Background task management
//!
//! Registers the engine's long-running timers (table timer ticker, log
//! cleanup), catches their panics and shuts them down together.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// A registered background task
struct RegisteredTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// Background task manager
///
/// # Example
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// let token = tasks.shutdown_token();
/// tasks.spawn("table_timer", async move {
///     ticker.run(token).await;
/// });
///
/// // Graceful shutdown
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    /// Shared cancellation token; every task should listen on a clone
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token tasks listen on for the shutdown signal
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Register and start a background task
    ///
    /// The task is wrapped to catch panics; an early exit is logged.
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let wrapped_future = async move {
            let result: Result<(), Box<dyn std::any::Any + Send>> =
                AssertUnwindSafe(future).catch_unwind().await;
            match result {
                Ok(()) => {
                    if !shutdown.is_cancelled() {
                        tracing::warn!(task = %name, "Background task completed unexpectedly");
                    }
                }
                Err(panic_info) => {
                    let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(task = %name, panic = %panic_msg, "Background task panicked");
                }
            }
        };

        let handle = tokio::spawn(wrapped_future);
        tracing::debug!(task = %name, "Registered background task");
        self.tasks.push(RegisteredTask { name, handle });
    }

    /// Run `job` once per `period` (first run right away) until shutdown
    pub fn spawn_periodic<F>(&mut self, name: &'static str, period: Duration, mut job: F)
    where
        F: FnMut() + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        self.spawn(name, async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = interval.tick() => job(),
                }
            }
        });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.name).collect()
    }

    /// Number of tasks that already finished (panicked or exited early)
    pub fn check_health(&self) -> usize {
        let failed = self
            .tasks
            .iter()
            .filter(|t| t.handle.is_finished())
            .inspect(|t| tracing::error!(task = %t.name, "Background task unexpectedly finished"))
            .count();
        if failed > 0 {
            tracing::error!(
                failed,
                total = self.tasks.len(),
                "Background task health check failed"
            );
        }
        failed
    }

    /// Graceful shutdown: cancel every task and wait for it
    pub async fn shutdown(self) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());
        self.shutdown.cancel();

        for task in self.tasks {
            match task.handle.await {
                Ok(()) => tracing::debug!(task = %task.name, "Task completed"),
                Err(e) if e.is_cancelled() => tracing::debug!(task = %task.name, "Task cancelled"),
                Err(e) => tracing::error!(task = %task.name, error = ?e, "Task failed"),
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_shutdown_cancels_listening_tasks() {
        let mut tasks = BackgroundTasks::new();
        let stopped = Arc::new(AtomicBool::new(false));

        let token = tasks.shutdown_token();
        let flag = stopped.clone();
        tasks.spawn("waiter", async move {
            token.cancelled().await;
            flag.store(true, Ordering::SeqCst);
        });

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.names(), vec!["waiter"]);
        assert_eq!(tasks.check_health(), 0);

        tasks.shutdown().await;
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_job_runs_until_shutdown() {
        let mut tasks = BackgroundTasks::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        tasks.spawn_periodic("counter", Duration::from_secs(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Runs at 0s, 10s and 20s
        tokio::time::sleep(Duration::from_secs(25)).await;
        tasks.shutdown().await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported_unhealthy() {
        let mut tasks = BackgroundTasks::new();
        tasks.spawn("boom", async {
            panic!("kaboom");
        });
        tokio::task::yield_now().await;
        for _ in 0..100 {
            if tasks.check_health() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(tasks.check_health(), 1);
        tasks.shutdown().await;
    }
}
