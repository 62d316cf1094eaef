//! Core library modules of wsbar.
//!
//! ## Layout
//!
//! - **Infrastructure**: [`config`], [`data_storage`], [`secret`], [`metadata`],
//!   [`messages`], [`logging`]
//! - **Refresh**: [`summary`], [`coordinator`], [`scheduler`]
//! - **Presentation**: [`formatter`], [`display`], [`host`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wsbar::api::Worksnaps;
//! use wsbar::libs::config::{Config, Settings};
//! use wsbar::libs::display::TerminalSurface;
//! use wsbar::libs::host::StatusHost;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Arc::new(Settings::new(Config::read()?));
//! let source = Worksnaps::new(&settings.get().api_url)?;
//! let mut host = StatusHost::new(source, settings, TerminalSurface::stdout(true));
//! host.on_user_requested_refresh().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod data_storage;
pub mod display;
pub mod formatter;
pub mod host;
pub mod logging;
pub mod messages;
pub mod metadata;
pub mod scheduler;
pub mod secret;
pub mod summary;
