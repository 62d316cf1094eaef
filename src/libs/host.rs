//! Lifecycle glue between the coordinator, the scheduler and a display surface.
//!
//! [`StatusHost`] is what a status bar integration drives:
//!
//! | hook                             | effect                                               |
//! |----------------------------------|------------------------------------------------------|
//! | [`on_activate`]                  | start the scheduler, spawn an immediate refresh      |
//! | [`on_deactivate`]                | stop the scheduler                                   |
//! | [`on_configuration_changed`]     | clear the cache, restart the scheduler, re-render    |
//! | [`on_user_requested_refresh`]    | refresh now, then re-render                          |
//!
//! The coordinator reports state changes through a listener. The host binds
//! that listener to an unbounded channel (see [`StatusHost::updates`]); the
//! task that owns the host drains it and calls
//! [`render_snapshot`](StatusHost::render_snapshot), so rendering always
//! happens on the owner's task.
//!
//! [`on_activate`]: StatusHost::on_activate
//! [`on_deactivate`]: StatusHost::on_deactivate
//! [`on_configuration_changed`]: StatusHost::on_configuration_changed
//! [`on_user_requested_refresh`]: StatusHost::on_user_requested_refresh

use super::config::Settings;
use super::coordinator::{RefreshCoordinator, StatusSnapshot};
use super::display::DisplaySurface;
use super::formatter::{format_segments, tooltip};
use super::scheduler::Scheduler;
use crate::api::SummarySource;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Status line of one display surface, kept current by a scheduler.
pub struct StatusHost<S: SummarySource, D: DisplaySurface> {
    settings: Arc<Settings>,
    coordinator: Arc<RefreshCoordinator<S>>,
    scheduler: Scheduler<S>,
    surface: D,
}

impl<S: SummarySource, D: DisplaySurface> StatusHost<S, D> {
    /// Wires a coordinator and a stopped scheduler to `surface`.
    ///
    /// # Arguments
    ///
    /// * `source` - Where summaries are fetched from
    /// * `settings` - Shared configuration, re-read on every refresh and render
    /// * `surface` - Where status lines are drawn
    pub fn new(source: S, settings: Arc<Settings>, surface: D) -> Self {
        let coordinator = Arc::new(RefreshCoordinator::new(source, Arc::clone(&settings)));
        let scheduler = Scheduler::new(Arc::clone(&coordinator));
        Self {
            settings,
            coordinator,
            scheduler,
            surface,
        }
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator<S>> {
        &self.coordinator
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    /// `true` between [`on_activate`](Self::on_activate) and [`on_deactivate`](Self::on_deactivate).
    pub fn is_active(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Interval of the running scheduler.
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.scheduler.interval()
    }

    /// Channel that receives a unit after every refresh attempt.
    ///
    /// Binding a new channel replaces the previous one.
    pub fn updates(&self) -> mpsc::UnboundedReceiver<()> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.coordinator.set_listener(Arc::new(move || {
            let _ = sender.send(());
        }));
        receiver
    }

    /// Starts periodic refreshes and fetches right away.
    pub fn on_activate(&mut self) {
        let interval = self.settings.get().refresh_period();
        self.scheduler.start(interval);

        let coordinator = Arc::clone(&self.coordinator);
        tokio::spawn(async move { coordinator.refresh().await });
        tracing::info!("status host activated");
    }

    /// Stops periodic refreshes. A fetch already running completes.
    pub fn on_deactivate(&mut self) {
        self.scheduler.stop();
        tracing::info!("status host deactivated");
    }

    /// Applies the current settings: drops cached data, restarts the
    /// scheduler with the new interval when active, and re-renders.
    ///
    /// The re-render reads the emptied cache and therefore triggers a fresh
    /// fetch. A fetch that is already running fetches again with the new
    /// settings once it returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface fails to render.
    pub fn on_configuration_changed(&mut self) -> Result<()> {
        self.coordinator.clear_cache();
        if self.scheduler.is_running() {
            self.scheduler.stop();
            self.scheduler.start(self.settings.get().refresh_period());
        }
        self.render()
    }

    /// Refreshes immediately and re-renders once the refresh has completed.
    pub async fn on_user_requested_refresh(&mut self) -> Result<()> {
        self.coordinator.refresh().await;
        self.render_snapshot()
    }

    /// Renders the current state, triggering a background refresh when the
    /// cached summary is stale.
    pub fn render(&mut self) -> Result<()> {
        let snapshot = self.coordinator.status();
        self.draw(&snapshot)
    }

    /// Renders the current state without triggering anything.
    ///
    /// Use this for refresh notifications. After a failed refresh the cache
    /// is still stale, so [`render`](Self::render) would start the next fetch.
    pub fn render_snapshot(&mut self) -> Result<()> {
        let snapshot = self.coordinator.snapshot();
        self.draw(&snapshot)
    }

    fn draw(&mut self, snapshot: &StatusSnapshot) -> Result<()> {
        let config = self.settings.get();
        self.surface.set_tooltip(&tooltip(snapshot, &config));
        self.surface.render(&format_segments(snapshot, &config))
    }
}
