//! Command line arguments
//!
//! Global options apply to every subcommand and override the configuration
//! file. Logging options mirror the `log-*` configuration keys.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "mediaindex")]
#[command(about = "Index channel media into a deduplicated catalog")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Force coloured output
    #[arg(long = "color", global = true, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true,
          value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", global = true,
          value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a whole index conversation against a channel fixture
    Replay(ReplayArgs),
    /// Load and validate the configuration, then print the effective values
    CheckConfig,
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct ReplayArgs {
    /// Channel fixture (JSON: chat metadata and messages)
    #[arg(long, value_name = "FILE")]
    pub fixture: PathBuf,

    /// Permalink sent as the index request
    #[arg(long, value_name = "URL")]
    pub link: String,

    /// Reply to the skip prompt, sent verbatim
    #[arg(long, value_name = "N", default_value = "0")]
    pub skip: String,

    /// User id acting as the operator (defaults to the first configured admin)
    #[arg(long, value_name = "ID", allow_hyphen_values = true)]
    pub operator: Option<i64>,

    /// Request cancellation after this many catalog saves
    #[arg(long, value_name = "N")]
    pub cancel_after: Option<usize>,
}

impl Args {
    /// Net `-v`/`-q` count, positive is more verbose
    pub fn verbosity(&self) -> i8 {
        (self.verbose as i8).saturating_sub(self.quiet as i8)
    }

    /// Explicit colour choice, `None` when neither flag was given
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
