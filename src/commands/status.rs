//! One-shot status command.
//!
//! Fetches today's summary once and prints a single status line. Suitable for
//! status bars that poll a command (i3blocks, tmux `#()`), for which `watch`
//! is the long-running alternative.

use super::OutputFormat;
use crate::{
    api::Worksnaps,
    libs::{
        config::{Config, Settings},
        coordinator::RefreshError,
        host::StatusHost,
        messages::Message,
    },
    msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Output format of the status line
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Print plain text without ANSI colors
    #[arg(long)]
    no_color: bool,
}

pub async fn cmd(args: StatusArgs) -> Result<()> {
    let config = Config::read()?;
    config.validate()?;
    if !config.is_configured() {
        msg_warning!(Message::NotConfigured);
    }

    let source = Worksnaps::new(&config.api_url)?;
    let settings = Arc::new(Settings::new(config));
    let mut host = StatusHost::new(source, settings, args.format.surface(!args.no_color));

    host.on_user_requested_refresh().await?;

    match host.coordinator().last_error() {
        Some(RefreshError::ConfigurationMissing) | None => {}
        Some(error) => msg_warning!(Message::RefreshFailed(error.to_string())),
    }
    Ok(())
}
