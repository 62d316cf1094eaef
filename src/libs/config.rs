//! Configuration management for wsbar.
//!
//! This module owns everything the status line needs to know before it can
//! talk to Worksnaps: credentials, the target workday length, the refresh
//! cadence and the display toggles.
//!
//! ## Storage
//!
//! - Settings live in `config.json` inside the platform data directory
//!   (see [`DataStorage`]). Missing keys fall back to their defaults.
//! - The API token is never written to `config.json`. It is kept in an
//!   encrypted file managed by [`Secret`]; the `WSBAR_API_TOKEN` environment
//!   variable (also picked up from `.env`) takes precedence over it.
//!
//! ## Runtime changes
//!
//! A running status line holds its configuration in [`Settings`]. Replacing
//! the configuration bumps a revision on a `tokio::sync::watch` channel, which
//! the host listens to in order to clear the cache and restart the scheduler.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wsbar::libs::config::{Config, Settings};
//!
//! let config = Config::read()?;
//! config.validate()?;
//! let settings = Settings::new(config);
//! assert!(settings.get().refresh_interval > 0);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use super::secret::Secret;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::time::Duration;
use tokio::sync::watch;

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Encrypted API token file name inside the data directory.
pub const TOKEN_FILE_NAME: &str = ".ws_token";

/// Environment variable that overrides the stored API token.
pub const TOKEN_ENV_VAR: &str = "WSBAR_API_TOKEN";

/// Public Worksnaps API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.worksnaps.com/api";

/// Settings of the status line.
///
/// `api_token` is filled in from the secret store or the environment when the
/// configuration is read and is skipped during serialization.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Worksnaps API, without a trailing slash.
    pub api_url: String,

    /// Worksnaps API token, used as the Basic auth user name.
    #[serde(skip)]
    pub api_token: String,

    /// Worksnaps project whose time entries are summed up.
    pub project_id: String,

    /// Worksnaps user id. When absent it is resolved from the token on the
    /// first refresh and cached until the configuration changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Seconds between scheduled refreshes. Must be positive.
    pub refresh_interval: u64,

    /// Length of the workday in hours. Must be positive.
    pub target_hours: f64,

    /// Text shown in front of the status line.
    pub prefix: String,

    /// Show today's worked time.
    pub show_time: bool,

    /// Show the average activity level.
    pub show_activity: bool,

    /// Show the remaining time (or overtime). Only shown together with the worked time.
    pub show_remaining: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: String::new(),
            project_id: String::new(),
            user_id: None,
            refresh_interval: 60,
            target_hours: 8.0,
            prefix: "WS:".to_string(),
            show_time: true,
            show_activity: true,
            show_remaining: true,
        }
    }
}

impl Config {
    /// Reads the configuration from the platform data directory.
    ///
    /// A missing `config.json` yields the defaults. The API token is taken
    /// from `WSBAR_API_TOKEN` when set, otherwise from the encrypted store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the stored token cannot be decrypted.
    pub fn read() -> Result<Config> {
        Self::read_in(&DataStorage::new())
    }

    /// Same as [`Config::read`] for an explicit storage directory.
    pub fn read_in(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        let mut config = if config_file_path.exists() {
            let config_str = fs::read_to_string(config_file_path)?;
            serde_json::from_str::<Config>(&config_str)?
        } else {
            Config::default()
        };

        config.api_token = match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => Self::token_secret(storage)?.get()?.unwrap_or_default(),
        };
        config.user_id = config.user_id.filter(|id| !id.trim().is_empty());

        Ok(config)
    }

    /// Writes `config.json` and, when a token is set, the encrypted token file.
    pub fn save(&self) -> Result<()> {
        self.save_in(&DataStorage::new())
    }

    /// Same as [`Config::save`] for an explicit storage directory.
    pub fn save_in(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;

        if !self.api_token.is_empty() {
            Self::token_secret(storage)?.store(&self.api_token)?;
        }
        Ok(())
    }

    /// Removes `config.json` and the stored token.
    pub fn delete_in(storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Self::token_secret(storage)?.delete()
    }

    /// Checks the numeric settings.
    ///
    /// # Errors
    ///
    /// Fails when `refresh_interval` is zero or `target_hours` is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval == 0 {
            msg_bail_anyhow!(Message::ConfigInvalidInterval);
        }
        if !self.target_hours.is_finite() || self.target_hours <= 0.0 {
            msg_bail_anyhow!(Message::ConfigInvalidTargetHours(self.target_hours));
        }
        Ok(())
    }

    /// `true` when both the API token and the project id are set.
    pub fn is_configured(&self) -> bool {
        !self.api_token.trim().is_empty() && !self.project_id.trim().is_empty()
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }

    /// Runs the interactive setup wizard, starting from the current configuration.
    ///
    /// The token prompt is hidden and only shown when no token is stored yet
    /// or the user chooses to replace it.
    pub fn init() -> Result<Self> {
        let current = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        msg_print!(Message::ConfigModuleWorksnaps);

        let secret = Self::token_secret(&DataStorage::new())?;
        let api_token = if current.api_token.is_empty()
            || Confirm::with_theme(&theme)
                .with_prompt(Message::PromptReplaceToken.to_string())
                .default(false)
                .interact()?
        {
            secret.prompt()?
        } else {
            current.api_token.clone()
        };

        let config = Config {
            api_url: Input::with_theme(&theme)
                .with_prompt(Message::PromptApiUrl.to_string())
                .default(current.api_url)
                .interact_text()?,
            api_token,
            project_id: Input::with_theme(&theme)
                .with_prompt(Message::PromptProjectId.to_string())
                .default(current.project_id)
                .interact_text()?,
            user_id: {
                let user_id: String = Input::with_theme(&theme)
                    .with_prompt(Message::PromptUserId.to_string())
                    .default(current.user_id.unwrap_or_default())
                    .allow_empty(true)
                    .interact_text()?;
                Some(user_id.trim().to_string()).filter(|id| !id.is_empty())
            },
            refresh_interval: Input::with_theme(&theme)
                .with_prompt(Message::PromptRefreshInterval.to_string())
                .default(current.refresh_interval)
                .validate_with(|value: &u64| if *value > 0 { Ok(()) } else { Err(Message::ConfigInvalidInterval.to_string()) })
                .interact_text()?,
            target_hours: Input::with_theme(&theme)
                .with_prompt(Message::PromptTargetHours.to_string())
                .default(current.target_hours)
                .validate_with(|value: &f64| {
                    if value.is_finite() && *value > 0.0 {
                        Ok(())
                    } else {
                        Err(Message::ConfigInvalidTargetHours(*value).to_string())
                    }
                })
                .interact_text()?,
            prefix: Input::with_theme(&theme)
                .with_prompt(Message::PromptPrefix.to_string())
                .default(current.prefix)
                .allow_empty(true)
                .interact_text()?,
            show_time: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptShowTime.to_string())
                .default(current.show_time)
                .interact()?,
            show_remaining: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptShowRemaining.to_string())
                .default(current.show_remaining)
                .interact()?,
            show_activity: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptShowActivity.to_string())
                .default(current.show_activity)
                .interact()?,
        };

        config.validate()?;
        Ok(config)
    }

    fn token_secret(storage: &DataStorage) -> Result<Secret> {
        Ok(Secret::at(storage.get_path(TOKEN_FILE_NAME)?, &Message::PromptApiToken.to_string()))
    }
}

/// Runtime holder of the current configuration.
///
/// Readers get cheap snapshots; every effective change is announced on a
/// revision channel.
#[derive(Debug)]
pub struct Settings {
    current: RwLock<Config>,
    revision: watch::Sender<u64>,
}

impl Settings {
    /// Creates the holder with `config` as revision zero.
    pub fn new(config: Config) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            current: RwLock::new(config),
            revision,
        }
    }

    /// Snapshot of the current configuration.
    pub fn get(&self) -> Config {
        self.current.read().clone()
    }

    /// `true` when the current configuration has a token and a project id.
    ///
    /// Same as `get().is_configured()` without cloning the configuration.
    pub fn is_configured(&self) -> bool {
        self.current.read().is_configured()
    }

    /// Replaces the configuration. Returns `false` and notifies nobody when
    /// `config` equals the current one.
    pub fn replace(&self, config: Config) -> bool {
        {
            let mut current = self.current.write();
            if *current == config {
                return false;
            }
            *current = config;
        }
        self.revision.send_modify(|revision| *revision += 1);
        true
    }

    /// Receiver that observes a new revision after every effective change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
