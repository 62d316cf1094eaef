//! Today's work summary and its cache entry.

use tokio::time::Instant;

/// Hours worked and average activity for the current day.
///
/// Produced fresh by every successful fetch and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkSummary {
    /// Total tracked time in hours, never negative.
    pub hours_worked: f64,
    /// Average activity level as a percentage in `0..=100`.
    pub activity_percent: u8,
}

impl WorkSummary {
    /// Creates a summary, clamping negative hours to zero and activity to 100.
    pub fn new(hours_worked: f64, activity_percent: u8) -> Self {
        Self {
            hours_worked: hours_worked.max(0.0),
            activity_percent: activity_percent.min(100),
        }
    }

    /// The summary of a day without any time entries.
    pub fn zero() -> Self {
        Self::new(0.0, 0)
    }
}

/// A summary together with the moment it was fetched.
#[derive(Debug, Clone, Copy)]
pub struct CacheEntry {
    pub summary: WorkSummary,
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// Entry stamped with the current instant.
    pub fn new(summary: WorkSummary) -> Self {
        Self {
            summary,
            fetched_at: Instant::now(),
        }
    }

    /// Returns `true` while the entry is younger than `ttl`.
    pub fn is_fresh(&self, ttl: std::time::Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}
