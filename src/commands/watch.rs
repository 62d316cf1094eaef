//! Long-running status line.
//!
//! Activates a [`StatusHost`] and prints a line every time the coordinator
//! reports a refresh, until interrupted.
//!
//! ## Signals
//!
//! | signal             | effect                                   |
//! |--------------------|------------------------------------------|
//! | `SIGUSR1`          | refresh now (bind it to a click handler) |
//! | `SIGHUP`           | reload the configuration file            |
//! | `SIGINT`/`SIGTERM` | deactivate and exit                      |
//!
//! On platforms without Unix signals only Ctrl+C is handled.

use super::OutputFormat;
use crate::{
    api::Worksnaps,
    libs::{
        config::{Config, Settings},
        host::StatusHost,
        messages::Message,
    },
    msg_error, msg_info, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Output format of the status line
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Print plain text without ANSI colors
    #[arg(long)]
    no_color: bool,
}

enum Signal {
    Refresh,
    Reload,
    Shutdown,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    let config = Config::read()?;
    config.validate()?;
    if !config.is_configured() {
        msg_warning!(Message::NotConfigured);
    }

    let source = Worksnaps::new(&config.api_url)?;
    let interval = config.refresh_interval;
    let settings = Arc::new(Settings::new(config));
    let mut host = StatusHost::new(source, Arc::clone(&settings), args.format.surface(!args.no_color));

    let mut signals = Signals::install()?;
    let mut updates = host.updates();
    let mut revisions = settings.subscribe();

    host.on_activate();
    host.render_snapshot()?;
    msg_info!(Message::WatchStarted(interval));

    loop {
        tokio::select! {
            Some(()) = updates.recv() => host.render_snapshot()?,
            Ok(()) = revisions.changed() => host.on_configuration_changed()?,
            signal = signals.next() => match signal {
                Signal::Refresh => {
                    msg_info!(Message::WatchManualRefresh);
                    host.on_user_requested_refresh().await?;
                }
                Signal::Reload => reload(&settings),
                Signal::Shutdown => break,
            },
        }
    }

    host.on_deactivate();
    msg_info!(Message::WatchStopped);
    Ok(())
}

/// Re-reads the configuration file into `settings`. Keeps the current
/// configuration when the new one cannot be read or is invalid.
fn reload(settings: &Settings) {
    msg_info!(Message::WatchReloadingConfig);

    let config = match Config::read().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            msg_error!(Message::WatchConfigReloadFailed(e.to_string()));
            return;
        }
    };

    if config.api_url != settings.get().api_url {
        msg_warning!(Message::WatchApiUrlRequiresRestart);
    }
    if !settings.replace(config) {
        msg_info!(Message::WatchConfigUnchanged);
    }
}

#[cfg(unix)]
struct Signals {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
    sighup: tokio::signal::unix::Signal,
    sigusr1: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn install() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let install = |kind: SignalKind| {
            signal(kind).map_err(|e| crate::msg_error_anyhow!(Message::WatchSignalHandlerFailed(e.to_string())))
        };

        Ok(Self {
            sigterm: install(SignalKind::terminate())?,
            sigint: install(SignalKind::interrupt())?,
            sighup: install(SignalKind::hangup())?,
            sigusr1: install(SignalKind::user_defined1())?,
        })
    }

    async fn next(&mut self) -> Signal {
        tokio::select! {
            _ = self.sigterm.recv() => {
                msg_info!(Message::WatchReceivedSigterm);
                Signal::Shutdown
            }
            _ = self.sigint.recv() => {
                msg_info!(Message::WatchReceivedSigint);
                Signal::Shutdown
            }
            _ = self.sighup.recv() => Signal::Reload,
            _ = self.sigusr1.recv() => Signal::Refresh,
        }
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn next(&mut self) -> Signal {
        match tokio::signal::ctrl_c().await {
            Ok(()) => msg_info!(Message::WatchReceivedCtrlC),
            Err(e) => {
                msg_error!(Message::WatchSignalHandlerFailed(e.to_string()));
                msg_warning!(Message::WatchSignalHandlingNotSupported);
                std::future::pending::<()>().await;
            }
        }
        Signal::Shutdown
    }
}
