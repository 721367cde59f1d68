//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "appforge",
    bin_name = "appforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Generate application source trees from a descriptor",
    long_about = "appforge turns a JSON or TOML project descriptor into a complete \
                  Android, iOS, React Native, Flutter, Express or FastAPI source \
                  tree and packages it as a zip archive.",
    after_help = "EXAMPLES:\n\
        \x20 appforge generate shop.json\n\
        \x20 appforge generate shop.toml --target flutter -o dist/\n\
        \x20 appforge generate shop.json --dry-run\n\
        \x20 appforge targets --format json\n\
        \x20 appforge completions bash > /usr/share/bash-completion/completions/appforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate and package a project from a descriptor.
    #[command(
        visible_alias = "gen",
        about = "Generate a project from a descriptor",
        after_help = "EXAMPLES:\n\
            \x20 appforge generate shop.json\n\
            \x20 appforge generate shop.json -t backend-fastapi -o out/ --force\n\
            \x20 appforge generate shop.json --dry-run --output-format json"
    )]
    Generate(GenerateArgs),

    /// List supported targets.
    #[command(
        visible_alias = "ls",
        about = "List supported targets",
        after_help = "EXAMPLES:\n\
            \x20 appforge targets\n\
            \x20 appforge targets --format csv\n\
            \x20 appforge targets --templates"
    )]
    Targets(TargetsArgs),

    /// Initialise an appforge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 appforge init                        # default location\n\
            \x20 appforge init --local                # .appforge.toml in CWD\n\
            \x20 appforge init --local --example shop.json"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 appforge completions bash > ~/.local/share/bash-completion/completions/appforge\n\
            \x20 appforge completions zsh  > ~/.zfunc/_appforge\n\
            \x20 appforge completions fish > ~/.config/fish/completions/appforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the appforge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 appforge config get generation.output_dir\n\
            \x20 appforge config set generation.seed 42\n\
            \x20 appforge config list"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `appforge generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Descriptor file (`.json` or `.toml`).
    #[arg(value_name = "DESCRIPTOR", help = "Descriptor file (.json or .toml)")]
    pub descriptor: PathBuf,

    /// Directory the archive is written to.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: generation.output_dir)"
    )]
    pub output: Option<PathBuf>,

    /// Override the descriptor's `target`.
    #[arg(
        short = 't',
        long = "target",
        value_name = "TARGET",
        help = "Override the descriptor target (see `appforge targets`)"
    )]
    pub target: Option<String>,

    /// Fixed identifier seed for reproducible output.
    #[arg(long = "seed", value_name = "N", help = "Seed for reproducible identifiers")]
    pub seed: Option<u64>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and generate immediately"
    )]
    pub yes: bool,

    /// Overwrite an existing archive.
    #[arg(long = "force", help = "Overwrite an existing archive")]
    pub force: bool,

    /// List what would be generated without writing anything.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,
}

// ── targets ───────────────────────────────────────────────────────────────────

/// Arguments for `appforge targets`.
#[derive(Debug, Args)]
pub struct TargetsArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    /// Also list the templates each target draws on.
    #[arg(long = "templates", help = "Include template names")]
    pub templates: bool,
}

/// Output format for the `targets` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `appforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location.
    #[arg(
        long = "global",
        conflicts_with = "local",
        help = "Create global configuration"
    )]
    pub global: bool,

    /// Write to `.appforge.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Also write a sample descriptor to this path.
    #[arg(
        long = "example",
        value_name = "PATH",
        help = "Write a sample descriptor (.json or .toml)"
    )]
    pub example: Option<PathBuf>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `appforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `appforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generation.output_dir`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "appforge",
            "generate",
            "shop.json",
            "-t",
            "flutter",
            "-o",
            "dist",
            "--force",
            "--seed",
            "7",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.descriptor, PathBuf::from("shop.json"));
        assert_eq!(args.target.as_deref(), Some("flutter"));
        assert_eq!(args.output, Some(PathBuf::from("dist")));
        assert_eq!(args.seed, Some(7));
        assert!(args.force && !args.dry_run && !args.yes);
    }

    #[test]
    fn gen_alias() {
        let cli = Cli::parse_from(["appforge", "gen", "shop.json", "--dry-run"]);
        assert!(matches!(cli.command, Commands::Generate(GenerateArgs { dry_run: true, .. })));
    }

    #[test]
    fn targets_format_defaults_to_table() {
        let cli = Cli::parse_from(["appforge", "targets"]);
        let Commands::Targets(args) = cli.command else {
            panic!("expected Targets command");
        };
        assert_eq!(args.format, ListFormat::Table);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "appforge",
            "targets",
            "-vv",
            "--output-format",
            "json",
            "--log-file",
            "run.log",
        ]);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
        assert_eq!(cli.global.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["appforge", "--quiet", "--verbose", "targets"]);
        assert!(result.is_err());
    }

    #[test]
    fn init_global_and_local_conflict() {
        let result = Cli::try_parse_from(["appforge", "init", "--global", "--local"]);
        assert!(result.is_err());
    }
}
