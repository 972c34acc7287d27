use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Interactive builder for step-by-step flows
///
/// Waypoint assembles named flows out of typed steps (titles, text, user
/// input, calculations over earlier inputs, file reads and file writes),
/// runs them, tracks their starts, completions and errors, and keeps an
/// append-only text log of everything it builds.
#[derive(Parser)]
#[command(version, about, name = "waypoint")]
pub struct Args {
    /// Path to the audit log file. Defaults to
    /// $XDG_DATA_HOME/waypoint/flows.txt
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print flow analyses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Waypoint CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive menu (the default)
    #[command(alias = "s")]
    Session,
    /// Print the audit log verbatim
    Log,
    /// List the step kinds a flow can contain
    Steps,
}
