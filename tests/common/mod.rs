//! Stub summary source and display surface shared by the integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wsbar::api::{SourceError, SummarySource};
use wsbar::libs::config::Config;
use wsbar::libs::display::DisplaySurface;
use wsbar::libs::formatter::{plain_text, Segment};
use wsbar::libs::summary::WorkSummary;

#[derive(Default)]
struct StubState {
    fetches: AtomicUsize,
    lookups: AtomicUsize,
    tokens: Mutex<Vec<String>>,
    outcomes: Mutex<VecDeque<Result<WorkSummary, SourceError>>>,
    delay: Mutex<Duration>,
}

/// Summary source that counts calls and replays queued outcomes.
///
/// Without queued outcomes every fetch returns 6 hours at 85% activity.
#[derive(Clone, Default)]
pub struct StubSource {
    state: Arc<StubState>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: Result<WorkSummary, SourceError>) -> &Self {
        self.state.outcomes.lock().push_back(outcome);
        self
    }

    /// Every fetch sleeps for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock() = delay;
    }

    pub fn fetches(&self) -> usize {
        self.state.fetches.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.state.lookups.load(Ordering::SeqCst)
    }

    /// Tokens passed to `resolve_user_id`, in call order.
    pub fn tokens(&self) -> Vec<String> {
        self.state.tokens.lock().clone()
    }
}

impl SummarySource for StubSource {
    async fn resolve_user_id(&self, api_token: &str) -> Result<String, SourceError> {
        self.state.lookups.fetch_add(1, Ordering::SeqCst);
        self.state.tokens.lock().push(api_token.to_string());
        Ok(format!("user-{}", api_token))
    }

    async fn fetch_today_summary(&self, _api_token: &str, _user_id: &str, _project_id: &str) -> Result<WorkSummary, SourceError> {
        self.state.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = *self.state.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.state.outcomes.lock().pop_front();
        outcome.unwrap_or_else(|| Ok(WorkSummary::new(6.0, 85)))
    }
}

/// Surface that keeps every rendered frame.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    tooltip: String,
    pub frames: Vec<(String, String)>,
}

impl RecordingSurface {
    /// Text of the last frame.
    pub fn last_text(&self) -> Option<&str> {
        self.frames.last().map(|(text, _)| text.as_str())
    }

    /// Tooltip of the last frame.
    pub fn last_tooltip(&self) -> Option<&str> {
        self.frames.last().map(|(_, tooltip)| tooltip.as_str())
    }
}

impl DisplaySurface for RecordingSurface {
    fn render(&mut self, segments: &[Segment]) -> anyhow::Result<()> {
        self.frames.push((plain_text(segments), self.tooltip.clone()));
        Ok(())
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.tooltip = tooltip.to_string();
    }
}

/// Complete configuration with the defaults otherwise.
pub fn configured() -> Config {
    Config {
        api_token: "token".to_string(),
        project_id: "42".to_string(),
        ..Config::default()
    }
}

/// Lets spawned tasks run. With paused time this also auto-advances the clock slightly.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
