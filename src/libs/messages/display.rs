//! Display implementation for wsbar messages.
//!
//! All user-facing text is defined here, in one match, so that wording stays
//! consistent between the CLI commands, the setup wizard and the log output.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration and stored API token removed".to_string(),
            Message::ConfigModuleWorksnaps => "Worksnaps settings".to_string(),
            Message::ConfigInvalidInterval => "Refresh interval must be greater than zero seconds".to_string(),
            Message::ConfigInvalidTargetHours(hours) => format!("Target hours must be a positive number, got {}", hours),
            Message::NotConfigured => "Worksnaps is not configured. Run `wsbar init` first.".to_string(),

            // === PROMPTS ===
            Message::PromptApiToken => "Enter your Worksnaps API token".to_string(),
            Message::PromptReplaceToken => "An API token is already stored. Replace it?".to_string(),
            Message::PromptApiUrl => "Enter the Worksnaps API URL".to_string(),
            Message::PromptProjectId => "Enter the Worksnaps project ID".to_string(),
            Message::PromptUserId => "Enter your Worksnaps user ID (leave empty to detect)".to_string(),
            Message::PromptRefreshInterval => "Refresh interval (seconds)".to_string(),
            Message::PromptTargetHours => "Target hours per day".to_string(),
            Message::PromptPrefix => "Status line prefix".to_string(),
            Message::PromptShowTime => "Show worked time?".to_string(),
            Message::PromptShowRemaining => "Show remaining time?".to_string(),
            Message::PromptShowActivity => "Show activity level?".to_string(),

            // === STATUS MESSAGES ===
            Message::RefreshFailed(error) => format!("Failed to refresh Worksnaps data: {}", error),

            // === WATCH MESSAGES ===
            Message::WatchStarted(interval) => format!("Watching Worksnaps, refreshing every {} seconds", interval),
            Message::WatchStopped => "Stopped watching Worksnaps".to_string(),
            Message::WatchReceivedSigterm => "Received SIGTERM, shutting down".to_string(),
            Message::WatchReceivedSigint => "Received SIGINT, shutting down".to_string(),
            Message::WatchReceivedCtrlC => "Received Ctrl+C, shutting down".to_string(),
            Message::WatchManualRefresh => "Manual refresh requested".to_string(),
            Message::WatchReloadingConfig => "Reloading configuration".to_string(),
            Message::WatchConfigUnchanged => "Configuration unchanged".to_string(),
            Message::WatchApiUrlRequiresRestart => "The API URL changed; restart `wsbar watch` to use it".to_string(),
            Message::WatchConfigReloadFailed(error) => format!("Failed to reload configuration, keeping the current one: {}", error),
            Message::WatchSignalHandlerFailed(error) => format!("Failed to install signal handler: {}", error),
            Message::WatchSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
        };
        write!(f, "{}", text)
    }
}
