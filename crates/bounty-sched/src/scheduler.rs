//! Periodic job scheduling with cooperative cancellation.
//!
//! A [`Scheduler`] owns a set of named periodic jobs. Each job runs a
//! [`PeriodicTask`] on an interval until cancelled; cancellation is
//! cooperative and takes effect between ticks.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A unit of work invoked once per tick.
#[async_trait]
pub trait PeriodicTask: Send + 'static {
    /// Run one tick of the task. Errors are the task's own concern;
    /// the scheduler keeps ticking regardless.
    async fn run_once(&mut self);
}

/// Handle to a spawned job: cancel it or check whether it stopped.
pub struct JobHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl JobHandle {
    /// Request shutdown and wait for the job to stop.
    pub async fn cancel(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }

    /// Whether the job's task has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Owns spawned periodic jobs by name.
#[derive(Default)]
pub struct Scheduler {
    jobs: HashMap<String, JobHandle>,
}

impl Scheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a periodic job. The first tick fires immediately.
    ///
    /// Replaces any previous job with the same name; the displaced job's
    /// shutdown channel closes, which stops it at its next loop turn.
    pub fn spawn_periodic<T: PeriodicTask>(&mut self, name: &str, period: Duration, mut task: T) {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let job_name = name.to_string();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        task.run_once().await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            debug!(job = %job_name, "periodic job stopping");
                            break;
                        }
                    }
                }
            }
        });

        self.jobs.insert(
            name.to_string(),
            JobHandle {
                shutdown: shutdown_tx,
                handle,
            },
        );
    }

    /// Cancel one job by name.
    pub async fn cancel(&mut self, name: &str) {
        if let Some(job) = self.jobs.remove(name) {
            job.cancel().await;
        }
    }

    /// Cancel every job.
    pub async fn shutdown(&mut self) {
        let names: Vec<String> = self.jobs.keys().cloned().collect();
        for name in names {
            self.cancel(&name).await;
        }
        info!("scheduler shut down");
    }

    /// Names of currently registered jobs.
    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingTask {
        ticks: Arc<AtomicU32>,
    }

    #[async_trait]
    impl PeriodicTask for CountingTask {
        async fn run_once(&mut self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_job_ticks_and_cancels() {
        let ticks = Arc::new(AtomicU32::new(0));
        let mut scheduler = Scheduler::new();
        scheduler.spawn_periodic(
            "counter",
            Duration::from_millis(10),
            CountingTask {
                ticks: Arc::clone(&ticks),
            },
        );

        tokio::time::sleep(Duration::from_millis(55)).await;
        scheduler.cancel("counter").await;
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 2, "expected at least 2 ticks, saw {seen}");

        // No more ticks after cancellation.
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_all() {
        let ticks = Arc::new(AtomicU32::new(0));
        let mut scheduler = Scheduler::new();
        for name in ["a", "b"] {
            scheduler.spawn_periodic(
                name,
                Duration::from_millis(10),
                CountingTask {
                    ticks: Arc::clone(&ticks),
                },
            );
        }
        assert_eq!(scheduler.job_names().len(), 2);

        scheduler.shutdown().await;
        assert!(scheduler.job_names().is_empty());
    }
}
