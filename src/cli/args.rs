use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Arguments for building a parameter map
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Request URI or query string (reads stdin if not provided).
    /// Input without `?` is read as a query unless it looks like a path.
    pub input: Option<String>,

    /// Form-encoded request body appended after the query parameters
    #[arg(long, value_name = "FILE")]
    pub form: Option<PathBuf>,

    /// Overlay an entry after construction (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overlays: Vec<String>,

    /// Print only the value at this separator-joined path
    #[arg(long, value_name = "PATH")]
    pub get: Option<String>,

    /// Separator for nested names (overrides settings)
    #[arg(long)]
    pub separator: Option<char>,

    /// Keep unsplit remainders at intermediate levels (overrides settings)
    #[arg(long)]
    pub keep_partial_keys: bool,

    /// Pretty-print JSON output
    #[arg(short = 'p', long, conflicts_with = "compact")]
    pub pretty: bool,

    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,

    /// Print the expansion collision report to stderr
    #[arg(long)]
    pub report: bool,
}

/// Config subcommand actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// List effective settings
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ConfigFormat,
    },

    /// Show one setting
    Show {
        /// Setting key, e.g. expansion.separator
        key: String,
    },
}

/// Output formats for config list
#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum ConfigFormat {
    Text,
    Json,
    Toml,
}
