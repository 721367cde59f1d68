//! Flags accepted by every `appforge` subcommand.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log level above the default WARN. Conflicts with `--quiet`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity (RUST_LOG overrides this):
    (none)  - warnings and errors
    -v      - generation and packaging milestones
    -vv     - pipeline steps, templates loaded, scratch tree
    -vvv    - project file identifier allocation"
    )]
    pub verbose: u8,

    /// Only errors reach the terminal; logs drop to ERROR.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Also set by `NO_COLOR` or `output.no_color`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Replaces the global and `.appforge.toml` lookup.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    /// `json` makes `generate`, `targets` and `config list` print a single
    /// JSON document on stdout.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,

    /// Also write logs to this file (no colours, always appended).
    #[arg(
        long = "log-file",
        global = true,
        value_name = "FILE",
        help = "Append logs to a file"
    )]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` when piped.
    #[default]
    Auto,
    Human,
    Plain,
    Json,
}

impl OutputFormat {
    /// Parse the `output.format` config value; unknown values mean `Auto`.
    pub fn from_config(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "human" => Self::Human,
            "plain" => Self::Plain,
            "json" => Self::Json,
            _ => Self::Auto,
        }
    }
}
