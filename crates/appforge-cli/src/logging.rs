//! Tracing setup for the `appforge` binary.
//!
//! The library crates only emit events; this module installs the one
//! subscriber. Events go to stderr at WARN by default, ERROR with `--quiet`
//! and one level lower per `-v`. `RUST_LOG` replaces that filter. With
//! `--log-file` the same events are appended, uncoloured, to the file.

use std::io::IsTerminal as _;
use std::path::Path;

use anyhow::Context as _;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Install the subscriber. Hold the returned guard until exit or the tail
/// of the log file is lost.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<Option<WorkerGuard>> {
    let level = derive_level(args);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "appforge={level},appforge_core={level},appforge_adapters={level}"
        ))
    });

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &args.log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))?;

    Ok(guard)
}

fn file_writer(
    path: &Path,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{GlobalArgs, OutputFormat};

    fn args_with(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
            log_file: None,
        }
    }

    #[test]
    fn verbosity_maps_to_levels() {
        let cases = [
            (0, false, "warn"),
            (1, false, "info"),
            (2, false, "debug"),
            (3, false, "trace"),
            (10, false, "trace"),
            (0, true, "error"),
            (3, true, "error"),
        ];
        for (verbose, quiet, level) in cases {
            let args = args_with(verbose, quiet);
            assert_eq!(derive_level(&args), level, "verbose={verbose} quiet={quiet}");
        }
    }

    #[test]
    fn file_writer_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/appforge.log");
        let (_writer, _guard) = file_writer(&path).unwrap();
        assert!(dir.path().join("logs").is_dir());
    }
}
