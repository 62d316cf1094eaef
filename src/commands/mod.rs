//! Command-line interface of wsbar.
//!
//! ## Commands
//!
//! - `init`: interactive setup, or removal of the configuration with `--delete`
//! - `status`: fetch once and print a single status line
//! - `watch`: keep printing a status line on every change until stopped

pub mod init;
pub mod status;
pub mod watch;

use crate::libs::display::{DisplaySurface, TerminalSurface, WaybarSurface};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Print today's summary once")]
    Status(status::StatusArgs),
    #[command(about = "Print today's summary on every change")]
    Watch(watch::WatchArgs),
}

/// Output flavour of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Text, ANSI colored unless `--no-color` is given
    #[default]
    Plain,
    /// JSON object for Waybar's custom module
    Waybar,
}

impl OutputFormat {
    /// Stdout surface for this format.
    pub fn surface(self, colors: bool) -> Box<dyn DisplaySurface> {
        match self {
            OutputFormat::Plain => Box::new(TerminalSurface::stdout(colors)),
            OutputFormat::Waybar => Box::new(WaybarSurface::stdout()),
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Status(args) => status::cmd(args).await,
            Commands::Watch(args) => watch::cmd(args).await,
        }
    }
}
