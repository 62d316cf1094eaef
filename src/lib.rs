//! # wsbar - Worksnaps status bar
//!
//! Keeps today's Worksnaps summary on a status bar: worked time, the time
//! remaining until the daily target and the average activity level, colored
//! by how the day is going.
//!
//! ## Features
//!
//! - **Cached Refresh**: summaries are cached for 60 seconds; concurrent
//!   refreshes collapse into a single request
//! - **Failure Tolerance**: when a refresh fails the last good numbers stay
//!   visible, marked as stale
//! - **Status Bar Output**: plain or ANSI colored lines, or Waybar JSON
//! - **Live Configuration**: `SIGHUP` reloads the configuration of a running
//!   `wsbar watch`, `SIGUSR1` refreshes immediately
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wsbar::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
