//! `appforge`: turn a project descriptor into a zipped Android, iOS, React
//! Native, Flutter, Express or FastAPI source tree.
//!
//! Exit status is 0 on success, 2 for descriptor or argument problems, 3 when
//! the descriptor file is missing, 4 for configuration problems and 1 for
//! anything else.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands, ConfigCommands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // APPFORGE_* settings may come from a .env file.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too and exit 0.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Flushes --log-file on drop.
    let _log_guard = match init_logging(&cli.global) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        config = ?cli.global.config,
        "appforge started"
    );

    // `init` and `config set` may point --config at a file they create.
    let creates_config = matches!(
        cli.command,
        Commands::Init(_) | Commands::Config(ConfigCommands::Set { .. })
    );
    let config_file = cli
        .global
        .config
        .as_ref()
        .filter(|path| !creates_config || path.is_file());
    let config = match AppConfig::load(config_file) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            eprintln!("Error: failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;
    let color = output.supports_color();

    match run(cli, config, output) {
        Ok(()) => {
            info!("appforge completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, color),
    }
}

#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Generate(cmd) => commands::generate::execute(cmd, cli.global, config, output),
        Commands::Targets(cmd) => commands::targets::execute(cmd, cli.global, output),
        Commands::Init(cmd) => commands::init::execute(cmd, cli.global, config, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global, config, output),
    }
}

/// Report `err` on stderr and map it to the process status.
fn handle_error(err: CliError, verbose: bool, color: bool) -> ExitCode {
    err.log();
    let color = color && std::io::IsTerminal::is_terminal(&std::io::stderr());
    eprint!("{}", err.render(verbose, color));
    ExitCode::from(err.exit_code())
}
