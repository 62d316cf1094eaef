//! Sources of today's work summary.
//!
//! The refresh coordinator only knows the [`SummarySource`] trait: resolve a
//! user id from an API token, then fetch today's summary for a user and
//! project. Wire formats and authentication stay inside the implementations,
//! so the coordinator can be driven by a stub in tests.
//!
//! ## Implementations
//!
//! - **Worksnaps**: [`worksnaps::Worksnaps`], the HTTP client for the public
//!   Worksnaps XML API.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wsbar::api::{worksnaps::Worksnaps, SummarySource};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Worksnaps::new("https://api.worksnaps.com/api")?;
//! let user_id = source.resolve_user_id("token").await?;
//! let summary = source.fetch_today_summary("token", &user_id, "42").await?;
//! println!("{} hours, {}%", summary.hours_worked, summary.activity_percent);
//! # Ok(())
//! # }
//! ```

use crate::libs::summary::WorkSummary;
use std::future::Future;
use thiserror::Error;

pub mod worksnaps;

pub use worksnaps::Worksnaps;

/// Why a summary source could not deliver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The request did not complete within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// The server could not be reached at all (DNS, refused connection, TLS).
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The server rejected the credentials.
    #[error("authentication rejected with status {0}")]
    Auth(u16),

    /// Non-success status or a payload that could not be understood.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The account lookup succeeded but did not contain a user id.
    #[error("user id not found in account response")]
    MissingUserId,

    /// A well-formed response without any time entries for today.
    #[error("no time entries for today")]
    NoData,
}

/// Capability to look up a user and fetch their summary for today.
///
/// Implementations must be shareable across tasks; the coordinator calls them
/// from spawned refreshes.
pub trait SummarySource: Send + Sync + 'static {
    /// Resolves the numeric user id that owns `api_token`.
    fn resolve_user_id(&self, api_token: &str) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Fetches the summary of today's time entries of `user_id` in `project_id`.
    ///
    /// A day without entries is reported as [`SourceError::NoData`].
    fn fetch_today_summary(
        &self,
        api_token: &str,
        user_id: &str,
        project_id: &str,
    ) -> impl Future<Output = Result<WorkSummary, SourceError>> + Send;
}
