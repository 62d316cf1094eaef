//! Refresh coordinator: the single owner of today's cached summary.
//!
//! The coordinator keeps the last successfully fetched [`WorkSummary`], the
//! error of the last refresh attempt and an in-flight flag, all behind one
//! mutex. It guarantees that
//!
//! - at most one fetch runs at a time (single-flight); callers arriving while
//!   a fetch is running wait for it instead of starting another one,
//! - a failed refresh never discards a good cache entry, so the status line
//!   keeps showing the last known numbers with a stale marker,
//! - readers always see a consistent snapshot: the data, the error and the
//!   in-flight flag of one refresh are published together.
//!
//! ## Cache lifetime
//!
//! Entries are fresh for [`CACHE_TTL`], independent of the scheduler's
//! interval. Reading a stale entry through [`RefreshCoordinator::get_summary`]
//! spawns a background refresh and returns the stale value right away.
//!
//! ## Notifications
//!
//! After every refresh attempt (successful, failed or rejected for missing
//! configuration) the bound [`StateListener`] is called from whatever task
//! ran the refresh. Listeners must hand the work over to their own context.

use super::config::{Config, Settings};
use super::summary::{CacheEntry, WorkSummary};
use crate::api::{SourceError, SummarySource};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// How long a fetched summary is served without refreshing.
pub const CACHE_TTL: Duration = Duration::from_secs(60);

/// Why the last refresh failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("API Token or Project ID not configured")]
    ConfigurationMissing,

    #[error("API request timed out. The server might be slow or unavailable.")]
    NetworkTimeout,

    #[error("No internet connection or server unavailable.")]
    NetworkUnreachable,

    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),
}

impl From<SourceError> for RefreshError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Timeout => RefreshError::NetworkTimeout,
            SourceError::Unreachable(_) => RefreshError::NetworkUnreachable,
            other => RefreshError::UnexpectedResponse(other.to_string()),
        }
    }
}

/// Receives a notification whenever the coordinator's state changed.
pub trait StateListener: Send + Sync {
    fn state_changed(&self);
}

impl<F> StateListener for F
where
    F: Fn() + Send + Sync,
{
    fn state_changed(&self) {
        self()
    }
}

/// Consistent view of the coordinator's state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    /// Cached summary, fresh or stale.
    pub summary: Option<WorkSummary>,
    /// Error of the last refresh attempt.
    pub last_error: Option<RefreshError>,
    /// A cached summary exists but the last refresh failed.
    pub using_cached_data: bool,
    /// A fetch is currently running.
    pub in_progress: bool,
}

#[derive(Debug, Default)]
struct RefreshState {
    cache: Option<CacheEntry>,
    last_error: Option<RefreshError>,
    in_progress: bool,
    /// User id resolved from the API token; cleared with the cache.
    user_id: Option<String>,
    /// Bumped by `clear_cache` so results of older fetches are dropped.
    epoch: u64,
}

impl RefreshState {
    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            summary: self.cache.map(|entry| entry.summary),
            last_error: self.last_error.clone(),
            using_cached_data: self.last_error.is_some() && self.cache.is_some(),
            in_progress: self.in_progress,
        }
    }
}

enum Attempt {
    Join(watch::Receiver<u64>),
    Rejected,
    Run { user_id: Option<String>, epoch: u64 },
}

struct Outcome {
    resolved_user_id: Option<String>,
    result: Result<WorkSummary, RefreshError>,
}

/// Resets the in-flight flag and releases waiting callers when a running
/// refresh is dropped before it completes.
struct InFlight<'a> {
    state: &'a Mutex<RefreshState>,
    completed: &'a watch::Sender<u64>,
    armed: bool,
}

impl InFlight<'_> {
    /// Marks the attempt as completed by the normal path.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().in_progress = false;
            self.completed.send_modify(|generation| *generation += 1);
            tracing::warn!("refresh dropped before completion");
        }
    }
}

/// Owner of the cached summary and of every refresh attempt.
///
/// Share it behind an [`Arc`]: [`get_summary`](Self::get_summary) and
/// [`status`](Self::status) spawn background refreshes that keep a clone.
pub struct RefreshCoordinator<S> {
    source: S,
    settings: Arc<Settings>,
    state: Mutex<RefreshState>,
    completed: watch::Sender<u64>,
    listener: Mutex<Option<Arc<dyn StateListener>>>,
}

impl<S: SummarySource> RefreshCoordinator<S> {
    /// Creates a coordinator with an empty cache.
    ///
    /// # Arguments
    ///
    /// * `source` - Where summaries are fetched from
    /// * `settings` - Configuration read at the start of every refresh
    pub fn new(source: S, settings: Arc<Settings>) -> Self {
        let (completed, _) = watch::channel(0);
        Self {
            source,
            settings,
            state: Mutex::new(RefreshState::default()),
            completed,
            listener: Mutex::new(None),
        }
    }

    /// Binds the listener notified after every refresh attempt, replacing any previous one.
    pub fn set_listener(&self, listener: Arc<dyn StateListener>) {
        *self.listener.lock() = Some(listener);
    }

    /// Returns the cached summary, triggering a background refresh when it is stale.
    ///
    /// Never blocks and never fails.
    ///
    /// # Returns
    ///
    /// The cached summary, fresh or stale. `None` while the configuration is
    /// incomplete or before the first successful fetch.
    pub fn get_summary(self: &Arc<Self>) -> Option<WorkSummary> {
        let (configured, snapshot) = self.observe();
        if configured {
            snapshot.summary
        } else {
            None
        }
    }

    /// Snapshot with [`get_summary`](Self::get_summary) semantics.
    ///
    /// The snapshot is taken under the same lock that decides whether a
    /// background refresh is needed.
    pub fn status(self: &Arc<Self>) -> StatusSnapshot {
        self.observe().1
    }

    /// Snapshot of the current state without any side effects.
    pub fn snapshot(&self) -> StatusSnapshot {
        self.state.lock().snapshot()
    }

    /// `true` when a cached summary is shown although the last refresh failed.
    pub fn is_using_cached_data(&self) -> bool {
        self.state.lock().snapshot().using_cached_data
    }

    /// Error of the last refresh attempt, `None` after a success.
    pub fn last_error(&self) -> Option<RefreshError> {
        self.state.lock().last_error.clone()
    }

    /// Drops the cached summary, the last error and the resolved user id.
    ///
    /// A fetch that is still running has its result discarded and fetches
    /// again with the configuration current at that point.
    pub fn clear_cache(&self) {
        let mut state = self.state.lock();
        state.cache = None;
        state.last_error = None;
        state.user_id = None;
        state.epoch += 1;
        tracing::debug!(epoch = state.epoch, "cache cleared");
    }

    /// Fetches today's summary and updates the cache.
    ///
    /// If another refresh is running this call starts nothing and returns
    /// once that refresh has completed. Failures are recorded as the last
    /// error and never returned.
    ///
    /// Dropping the returned future mid-fetch ends the attempt: the
    /// in-flight flag is reset and joined callers return.
    pub async fn refresh(&self) {
        let mut config = self.settings.get();

        let attempt = {
            let mut state = self.state.lock();
            if state.in_progress {
                Attempt::Join(self.completed.subscribe())
            } else {
                Self::begin(&mut state, &config)
            }
        };

        let (mut user_id, mut epoch) = match attempt {
            Attempt::Join(mut completed) => {
                tracing::debug!("refresh already in flight, joining it");
                let _ = completed.changed().await;
                return;
            }
            Attempt::Rejected => {
                tracing::warn!("refresh aborted: API token or project id is empty");
                self.notify();
                return;
            }
            Attempt::Run { user_id, epoch } => (user_id, epoch),
        };

        let in_flight = InFlight {
            state: &self.state,
            completed: &self.completed,
            armed: true,
        };

        loop {
            tracing::debug!(project_id = %config.project_id, "refresh started");
            let outcome = self.fetch(&config.api_token, &config.project_id, user_id).await;

            let retry = {
                let mut state = self.state.lock();
                if state.epoch == epoch {
                    Self::apply(&mut state, outcome);
                    state.in_progress = false;
                    None
                } else {
                    tracing::debug!("cache was cleared during the fetch, fetching again");
                    config = self.settings.get();
                    match Self::begin(&mut state, &config) {
                        Attempt::Run { user_id, epoch } => Some((user_id, epoch)),
                        _ => {
                            state.in_progress = false;
                            None
                        }
                    }
                }
            };

            match retry {
                Some((next_user_id, next_epoch)) => {
                    user_id = next_user_id;
                    epoch = next_epoch;
                }
                None => break,
            }
        }

        in_flight.disarm();
        self.completed.send_modify(|generation| *generation += 1);
        self.notify();
    }

    /// Decides whether an attempt may run with `config`, marking it in flight if so.
    fn begin(state: &mut RefreshState, config: &Config) -> Attempt {
        if !config.is_configured() {
            state.last_error = Some(RefreshError::ConfigurationMissing);
            return Attempt::Rejected;
        }
        state.in_progress = true;
        state.last_error = None;
        Attempt::Run {
            user_id: config.user_id.clone().or_else(|| state.user_id.clone()),
            epoch: state.epoch,
        }
    }

    fn apply(state: &mut RefreshState, outcome: Outcome) {
        if let Some(user_id) = outcome.resolved_user_id {
            state.user_id = Some(user_id);
        }
        match outcome.result {
            Ok(summary) => {
                tracing::info!(hours = summary.hours_worked, activity = summary.activity_percent, "refresh succeeded");
                state.cache = Some(CacheEntry::new(summary));
                state.last_error = None;
            }
            Err(error) => {
                tracing::warn!(%error, cached = state.cache.is_some(), "refresh failed");
                state.last_error = Some(error);
            }
        }
    }

    /// Configuration completeness and a snapshot, spawning a refresh when the
    /// cache is stale and nothing is in flight.
    fn observe(self: &Arc<Self>) -> (bool, StatusSnapshot) {
        let configured = self.settings.is_configured();
        let (snapshot, stale) = {
            let state = self.state.lock();
            let fresh = state.cache.is_some_and(|entry| entry.is_fresh(CACHE_TTL));
            (state.snapshot(), !fresh && !state.in_progress)
        };

        if configured && stale {
            self.spawn_refresh();
        }
        (configured, snapshot)
    }

    async fn fetch(&self, api_token: &str, project_id: &str, user_id: Option<String>) -> Outcome {
        let (user_id, resolved_user_id) = match user_id {
            Some(user_id) => (user_id, None),
            None => match self.source.resolve_user_id(api_token).await {
                Ok(user_id) => (user_id.clone(), Some(user_id)),
                Err(error) => {
                    return Outcome {
                        resolved_user_id: None,
                        result: Err(error.into()),
                    }
                }
            },
        };

        let result = match self.source.fetch_today_summary(api_token, &user_id, project_id).await {
            Ok(summary) => Ok(summary),
            Err(SourceError::NoData) => Ok(WorkSummary::zero()),
            Err(error) => Err(error.into()),
        };

        Outcome { resolved_user_id, result }
    }

    fn spawn_refresh(self: &Arc<Self>) {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let coordinator = Arc::clone(self);
                runtime.spawn(async move { coordinator.refresh().await });
            }
            Err(_) => tracing::warn!("stale summary not refreshed: no async runtime"),
        }
    }

    fn notify(&self) {
        let listener = self.listener.lock().clone();
        if let Some(listener) = listener {
            listener.state_changed();
        }
    }
}
