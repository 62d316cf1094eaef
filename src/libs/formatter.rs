//! Status line formatting.
//!
//! Turns a [`StatusSnapshot`] and the current [`Config`] into an ordered list
//! of [`Segment`]s plus a tooltip. Everything here is pure: identical inputs
//! always produce identical output, and neither the clock nor the network is
//! consulted.
//!
//! ## Layout
//!
//! ```text
//! WS: 6:40 (-1:20) | 85% ⚠
//! │   │    │         │   └── stale marker, only when showing cached data after a failed refresh
//! │   │    │         └────── activity, colored by tier
//! │   │    └──────────────── remaining time "(-H:MM)" or overtime "(+H:MM)"
//! │   └───────────────────── worked time, rounded to 10 minutes
//! └───────────────────────── prefix
//! ```
//!
//! ## Rounding
//!
//! Worked time is rounded to the nearest 10 minutes with halves going up.
//! The remaining time is computed from the *rounded* worked time and rounded
//! again, halves going away from zero, so the two numbers always add up to
//! the target.
//!
//! Colors are abstract [`ColorTier`]s; display surfaces decide what they look like.

use super::config::Config;
use super::coordinator::StatusSnapshot;

/// Activity at or above this percentage is good.
pub const ACTIVITY_GOOD: u8 = 80;
/// Activity at or above this percentage (and below good) is a warning.
pub const ACTIVITY_WARN: u8 = 60;

/// Abstract severity of a colored segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTier {
    Good,
    Warn,
    Bad,
    Stale,
}

impl ColorTier {
    /// Lower-case name, usable as a CSS class.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorTier::Good => "good",
            ColorTier::Warn => "warn",
            ColorTier::Bad => "bad",
            ColorTier::Stale => "stale",
        }
    }
}

/// A piece of the status line. `tier == None` means plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tier: Option<ColorTier>,
}

impl Segment {
    /// Uncolored text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), tier: None }
    }

    /// Text shown in the color of `tier`.
    pub fn colored(text: impl Into<String>, tier: ColorTier) -> Self {
        Self {
            text: text.into(),
            tier: Some(tier),
        }
    }
}

/// Concatenated text of all segments, without any styling.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(|segment| segment.text.as_str()).collect()
}

/// Rounds non-negative minutes to the nearest 10, halves up.
pub fn round_worked_minutes(minutes: i64) -> i64 {
    (minutes + 5).div_euclid(10) * 10
}

/// Rounds minutes to the nearest 10, halves away from zero.
pub fn round_away_from_zero(minutes: i64) -> i64 {
    if minutes >= 0 {
        (minutes + 5) / 10 * 10
    } else {
        -((-minutes + 5) / 10 * 10)
    }
}

/// Worked hours as whole minutes, rounded to 10.
pub fn rounded_worked_minutes(hours_worked: f64) -> i64 {
    // rounding to the whole minute absorbs float error of minutes / 60.0
    let minutes = (hours_worked.max(0.0) * 60.0).round() as i64;
    round_worked_minutes(minutes)
}

/// Formats minutes as `H:MM`. Hours are not padded.
pub fn format_hm(minutes: i64) -> String {
    let minutes = minutes.abs();
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Worked time as `H:MM`, rounded to 10 minutes.
pub fn format_time(hours_worked: f64) -> String {
    format_hm(rounded_worked_minutes(hours_worked))
}

/// Remaining time until `target_hours`, or overtime past it, with its tier.
///
/// Remaining time renders as `(-H:MM)` in [`ColorTier::Bad`], overtime as
/// `(+H:MM)` in [`ColorTier::Good`].
pub fn format_remaining(hours_worked: f64, target_hours: f64) -> (String, ColorTier) {
    let target_minutes = (target_hours * 60.0).round() as i64;
    let remaining = round_away_from_zero(target_minutes - rounded_worked_minutes(hours_worked));

    if remaining < 0 {
        (format!("(+{})", format_hm(remaining)), ColorTier::Good)
    } else {
        (format!("(-{})", format_hm(remaining)), ColorTier::Bad)
    }
}

/// Tier of an activity percentage.
pub fn activity_tier(activity_percent: u8) -> ColorTier {
    match activity_percent {
        p if p >= ACTIVITY_GOOD => ColorTier::Good,
        p if p >= ACTIVITY_WARN => ColorTier::Warn,
        _ => ColorTier::Bad,
    }
}

/// Builds the status line segments.
pub fn format_segments(snapshot: &StatusSnapshot, config: &Config) -> Vec<Segment> {
    let prefix = config.prefix.as_str();

    if !config.is_configured() {
        return vec![Segment::plain(format!("{} N/A", prefix))];
    }

    let Some(summary) = snapshot.summary else {
        let placeholder = if snapshot.last_error.is_some() { "⚠ Error" } else { "Loading..." };
        return vec![Segment::plain(format!("{} {}", prefix, placeholder))];
    };

    let mut segments = vec![Segment::plain(prefix)];

    if config.show_time {
        segments.push(Segment::plain(" "));
        segments.push(Segment::plain(format_time(summary.hours_worked)));

        if config.show_remaining {
            let (remaining, tier) = format_remaining(summary.hours_worked, config.target_hours);
            segments.push(Segment::plain(" "));
            segments.push(Segment::colored(remaining, tier));
        }
    }

    if config.show_activity {
        segments.push(Segment::plain(" | "));
        segments.push(Segment::colored(
            format!("{}%", summary.activity_percent),
            activity_tier(summary.activity_percent),
        ));
    }

    if snapshot.using_cached_data {
        segments.push(Segment::colored(" ⚠", ColorTier::Stale));
    }

    segments
}

/// Tooltip text for the status line.
pub fn tooltip(snapshot: &StatusSnapshot, config: &Config) -> String {
    if let Some(error) = &snapshot.last_error {
        format!("Error: {}\nClick to retry", error)
    } else if snapshot.using_cached_data {
        "(using cached data)\nClick to refresh".to_string()
    } else if !config.is_configured() {
        "Not configured".to_string()
    } else {
        "Click to refresh".to_string()
    }
}
