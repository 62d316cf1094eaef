//! Display surfaces for the status line.
//!
//! A surface receives the formatted [`Segment`]s and the tooltip and decides
//! what colors look like. Two surfaces are provided:
//!
//! - [`TerminalSurface`]: one line of text per render, ANSI colored through
//!   `console` styles unless colors are disabled.
//! - [`WaybarSurface`]: one JSON object per render in the format expected by
//!   Waybar's `custom` module (`return-type: json`), colors as Pango markup.
//!
//! Both write a full line and flush, so a status bar reading stdout line by
//! line always sees complete updates.

use super::formatter::{ColorTier, Segment};
use anyhow::Result;
use console::Style;
use serde::Serialize;
use std::io::{self, Stdout, Write};

/// Target of rendered status lines.
pub trait DisplaySurface {
    /// Shows the given segments.
    fn render(&mut self, segments: &[Segment]) -> Result<()>;

    /// Sets the tooltip shown with the next render.
    fn set_tooltip(&mut self, tooltip: &str);
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for Box<T> {
    fn render(&mut self, segments: &[Segment]) -> Result<()> {
        (**self).render(segments)
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        (**self).set_tooltip(tooltip)
    }
}

/// Pango color of a tier, `#RRGGBB`.
pub fn tier_hex(tier: ColorTier) -> &'static str {
    match tier {
        ColorTier::Good => "#00AA00",
        ColorTier::Warn => "#FFAA00",
        ColorTier::Bad => "#FF0000",
        ColorTier::Stale => "#FFA500",
    }
}

/// Terminal style of a tier.
pub fn tier_style(tier: ColorTier) -> Style {
    match tier {
        ColorTier::Good => Style::new().green(),
        ColorTier::Warn => Style::new().yellow(),
        ColorTier::Bad => Style::new().red(),
        ColorTier::Stale => Style::new().color256(214),
    }
}

/// Plain or ANSI colored text line.
pub struct TerminalSurface<W: Write = Stdout> {
    out: W,
    colors: bool,
    tooltip: String,
}

impl TerminalSurface<Stdout> {
    pub fn stdout(colors: bool) -> Self {
        Self::new(io::stdout(), colors)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, colors: bool) -> Self {
        Self {
            out,
            colors,
            tooltip: String::new(),
        }
    }

    /// Last tooltip set on the surface. Terminals have nowhere to show it.
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Renders segments to a single line without writing it anywhere.
    pub fn line(&self, segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|segment| match segment.tier {
                // styling is forced: status bars read from a pipe, not a tty
                Some(tier) if self.colors => tier_style(tier).force_styling(true).apply_to(&segment.text).to_string(),
                _ => segment.text.clone(),
            })
            .collect()
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn render(&mut self, segments: &[Segment]) -> Result<()> {
        let line = self.line(segments);
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.tooltip = tooltip.to_string();
    }
}

#[derive(Debug, Serialize)]
struct WaybarLine<'a> {
    text: String,
    tooltip: &'a str,
    class: Vec<&'static str>,
}

/// JSON lines for Waybar's `custom` module.
pub struct WaybarSurface<W: Write = Stdout> {
    out: W,
    tooltip: String,
}

impl WaybarSurface<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WaybarSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tooltip: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Serialized JSON object for the given segments and the current tooltip.
    pub fn line(&self, segments: &[Segment]) -> Result<String> {
        let text = segments
            .iter()
            .map(|segment| match segment.tier {
                Some(tier) => format!("<span color=\"{}\">{}</span>", tier_hex(tier), escape_markup(&segment.text)),
                None => escape_markup(&segment.text),
            })
            .collect();

        let mut class = Vec::new();
        for tier in segments.iter().filter_map(|segment| segment.tier) {
            if !class.contains(&tier.as_str()) {
                class.push(tier.as_str());
            }
        }

        Ok(serde_json::to_string(&WaybarLine {
            text,
            tooltip: &self.tooltip,
            class,
        })?)
    }
}

impl<W: Write> DisplaySurface for WaybarSurface<W> {
    fn render(&mut self, segments: &[Segment]) -> Result<()> {
        let line = self.line(segments)?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.tooltip = tooltip.to_string();
    }
}

/// Escapes text for Pango markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
