//! Worksnaps API client.
//!
//! Talks to the XML flavour of the Worksnaps REST API. Authentication is HTTP
//! Basic with the API token as user name and an empty password.
//!
//! ## Endpoints
//!
//! - `GET /me.xml`: account of the token owner, used to resolve the user id
//! - `GET /projects/{project}/time_entries.xml`: time entries of a user in a
//!   timestamp range; each entry carries `<duration_in_minutes>` and an
//!   `<activity_level>` on a 0 to 10 scale
//!
//! Only the handful of tags above are read, so the payloads are scraped with
//! regular expressions instead of being parsed into a full document.

use super::{SourceError, SummarySource};
use crate::libs::metadata::user_agent;
use crate::libs::summary::WorkSummary;
use anyhow::Result;
use chrono::{DateTime, Local, NaiveTime, TimeZone};
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::sync::OnceLock;
use std::time::Duration;

/// Connect and request timeout of every API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ME_PATH: &str = "me.xml";

/// HTTP client for one Worksnaps API endpoint.
#[derive(Debug, Clone)]
pub struct Worksnaps {
    client: Client,
    api_url: String,
}

impl Worksnaps {
    /// Creates a client for `api_url`, e.g. `https://api.worksnaps.com/api`.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built (TLS backend
    /// initialisation).
    pub fn new(api_url: &str) -> Result<Self> {
        Self::with_timeout(api_url, REQUEST_TIMEOUT)
    }

    /// Same as [`Worksnaps::new`] with a custom connect and request timeout.
    pub fn with_timeout(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(user_agent())
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, api_token: &str, path: &str, query: &[(&str, String)]) -> Result<String, SourceError> {
        let url = format!("{}/{}", self.api_url, path);
        tracing::debug!(%url, "requesting");

        let response = self
            .client
            .get(&url)
            .basic_auth(api_token, None::<&str>)
            .query(query)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "response received");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SourceError::Auth(status.as_u16())),
            status if !status.is_success() => Err(SourceError::UnexpectedResponse(format!("status {}", status))),
            _ => response.text().await.map_err(classify),
        }
    }
}

impl SummarySource for Worksnaps {
    async fn resolve_user_id(&self, api_token: &str) -> Result<String, SourceError> {
        let body = self.get(api_token, ME_PATH, &[]).await?;
        let user_id = parse_user_id(&body).ok_or(SourceError::MissingUserId)?;
        tracing::info!(%user_id, "resolved Worksnaps user id");
        Ok(user_id)
    }

    async fn fetch_today_summary(&self, api_token: &str, user_id: &str, project_id: &str) -> Result<WorkSummary, SourceError> {
        let (from, to) = today_range(Local::now());
        let path = format!("projects/{}/time_entries.xml", project_id);
        let query = [
            ("from_timestamp", from.to_string()),
            ("to_timestamp", to.to_string()),
            ("user_ids", user_id.to_string()),
        ];

        let body = self.get(api_token, &path, &query).await?;
        let summary = parse_time_entries(&body)?;
        tracing::info!(hours = summary.hours_worked, activity = summary.activity_percent, "fetched today's summary");
        Ok(summary)
    }
}

fn classify(error: reqwest::Error) -> SourceError {
    if error.is_timeout() {
        SourceError::Timeout
    } else if error.is_decode() || error.is_body() {
        SourceError::UnexpectedResponse(error.to_string())
    } else {
        // connect errors, DNS failures and anything else that kept the request from landing
        SourceError::Unreachable(error.to_string())
    }
}

/// Timestamp range of "today": midnight UTC of the local calendar date up to now.
pub fn today_range<Tz: TimeZone>(now: DateTime<Tz>) -> (i64, i64) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc().timestamp();
    (start, now.timestamp())
}

/// Extracts the first `<id>` of an account payload.
pub fn parse_user_id(xml: &str) -> Option<String> {
    static ID: OnceLock<Regex> = OnceLock::new();
    let id = ID.get_or_init(|| Regex::new(r"<id>\s*(\d+)\s*</id>").expect("valid id pattern"));
    id.captures(xml).map(|captures| captures[1].to_string())
}

/// Sums the durations and averages the activity levels of a time entries payload.
///
/// # Errors
///
/// - [`SourceError::UnexpectedResponse`] when the payload is an `<error>` document
/// - [`SourceError::NoData`] when it contains no `<time_entry>`
pub fn parse_time_entries(xml: &str) -> Result<WorkSummary, SourceError> {
    static ERROR: OnceLock<Regex> = OnceLock::new();
    static DURATION: OnceLock<Regex> = OnceLock::new();
    static ACTIVITY: OnceLock<Regex> = OnceLock::new();

    if xml.contains("<error>") {
        let error = ERROR.get_or_init(|| Regex::new(r"(?s)<error>(.*?)</error>").expect("valid error pattern"));
        let message = error
            .captures(xml)
            .map(|captures| captures[1].trim().to_string())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| "error document".to_string());
        return Err(SourceError::UnexpectedResponse(message));
    }

    if !xml.contains("<time_entry>") {
        return Err(SourceError::NoData);
    }

    let duration = DURATION.get_or_init(|| Regex::new(r"<duration_in_minutes>(\d+)</duration_in_minutes>").expect("valid duration pattern"));
    let activity = ACTIVITY.get_or_init(|| Regex::new(r"<activity_level>(\d+)</activity_level>").expect("valid activity pattern"));

    let total_minutes: u64 = duration.captures_iter(xml).filter_map(|captures| captures[1].parse::<u64>().ok()).sum();

    // levels are reported on a 0..=10 scale
    let levels: Vec<u64> = activity
        .captures_iter(xml)
        .filter_map(|captures| captures[1].parse::<u64>().ok())
        .map(|level| level * 10)
        .collect();
    let average_activity = match levels.len() {
        0 => 0,
        count => levels.iter().sum::<u64>() / count as u64,
    };

    Ok(WorkSummary::new(total_minutes as f64 / 60.0, average_activity.min(100) as u8))
}
