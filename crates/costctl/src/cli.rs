//! Command-line interface definitions for costctl.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

use crate::script::Action;

/// Command-line interface for the `costctl` binary.
#[derive(Parser, Debug)]
#[command(
    name = "costctl",
    about = "Inspect and drive the cost control settings screen",
    version
)]
pub struct Cli {
    /// Logging controls shared across costctl crates.
    #[command(flatten)]
    pub log: LogArgs,

    /// Settings file (JSON). Defaults to `~/.costctl/settings.json`.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Screen declaration (RON). Defaults to `~/.costctl/screen.ron`, then the built-in
    /// cost control screen.
    #[arg(long, global = true, value_name = "PATH")]
    pub screen: Option<PathBuf>,

    /// Locale used for option labels, e.g. `es` or `en-US`.
    #[arg(long, global = true, value_name = "LANG")]
    pub locale: Option<String>,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate a screen declaration.
    Check(CheckArgs),
    /// Bind the screen to the store and print every control.
    Show,
    /// Apply interactions in order, then print every control.
    Run(RunArgs),
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Screen file to check. The resolved screen is used when omitted.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Print the parsed declaration as JSON.
    #[arg(long)]
    pub dump: bool,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Actions such as `open:plantype`, `choose:plantype=postpaid`, `toggle:lowlimit=off`,
    /// `edit:lowlimit_threshold=10`, `cancel:KEY`, `set:KEY=JSON`, `locale:es` or
    /// `reset:request|confirm|cancel`.
    #[arg(value_name = "ACTION", num_args = 1.., required = true)]
    pub actions: Vec<Action>,
}
