//! Periodic job runner.
//!
//! Every lifecycle pass runs on its own tokio task, driven by its own
//! interval. A tick that fires while the previous run is still going is
//! skipped rather than queued.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// A running periodic job.
#[derive(Debug)]
pub struct Job {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Job {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the job. A run in progress is cancelled at its next await point.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Spawn `run` every `every`, starting immediately.
///
/// # Panics
///
/// Panics if `every` is zero.
pub fn spawn_periodic<F, Fut>(name: &'static str, every: Duration, mut run: F) -> Job
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            tracing::debug!(job = name, "job tick");
            run().await;
        }
    });
    tracing::info!(job = name, every_secs = every.as_secs(), "periodic job started");
    Job { name, handle }
}

/// The set of jobs started by the daemon.
#[derive(Debug, Default)]
pub struct Jobs {
    jobs: Vec<Job>,
}

impl Jobs {
    pub fn push(&mut self, job: Job) {
        self.jobs.push(job);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Abort every job.
    pub fn shutdown(self) {
        for job in &self.jobs {
            tracing::info!(job = job.name(), "stopping job");
            job.abort();
        }
    }
}
