//! Periodic refresh of the coordinator.
//!
//! The scheduler owns at most one background loop. Each iteration waits for
//! the configured interval and then awaits [`RefreshCoordinator::refresh`],
//! so ticks never overlap and a slow fetch simply delays the next one.
//!
//! Cancellation only interrupts the wait: a fetch that is already running is
//! allowed to finish, after which the loop exits.

use super::coordinator::RefreshCoordinator;
use crate::api::SummarySource;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Shortest accepted interval; shorter ones are raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

struct ScheduledRun {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    interval: Duration,
}

/// Drives [`RefreshCoordinator::refresh`] on a fixed interval.
pub struct Scheduler<S: SummarySource> {
    coordinator: Arc<RefreshCoordinator<S>>,
    run: Option<ScheduledRun>,
}

impl<S: SummarySource> Scheduler<S> {
    /// Creates a stopped scheduler for `coordinator`.
    pub fn new(coordinator: Arc<RefreshCoordinator<S>>) -> Self {
        Self { coordinator, run: None }
    }

    /// Starts the refresh loop, replacing a loop that is already running.
    ///
    /// The first refresh happens one `interval` after the call, not
    /// immediately.
    ///
    /// # Arguments
    ///
    /// * `interval` - Pause between the end of one refresh and the next,
    ///   raised to [`MIN_INTERVAL`] when shorter
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn start(&mut self, interval: Duration) {
        self.stop();

        let interval = interval.max(MIN_INTERVAL);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Self::run_loop(Arc::clone(&self.coordinator), interval, cancel.clone()));

        tracing::info!(interval_secs = interval.as_secs_f64(), "scheduler started");
        self.run = Some(ScheduledRun { cancel, handle, interval });
    }

    /// Stops the loop. Does nothing when it is not running.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
            tracing::info!("scheduler stopped");
        }
    }

    /// `true` while a loop started by [`start`](Self::start) is alive.
    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.handle.is_finished())
    }

    /// Interval of the running loop.
    pub fn interval(&self) -> Option<Duration> {
        self.run.as_ref().map(|run| run.interval)
    }

    async fn run_loop(coordinator: Arc<RefreshCoordinator<S>>, interval: Duration, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            tracing::debug!("scheduled refresh");
            coordinator.refresh().await;
        }
        tracing::debug!("refresh loop exited");
    }
}

impl<S: SummarySource> Drop for Scheduler<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
