//! Terminal output for command results.
//!
//! Results go to stdout; progress spinners and errors go to stderr.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // --output-format beats output.format; auto picks by stdout.
        let requested = match args.output_format {
            OutputFormat::Auto => OutputFormat::from_config(&config.output.format),
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }

    /// Plain line; suppressed in quiet mode like every writer but `json`.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// `✓ <msg>`
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// `⚠ <msg>`
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// `ℹ <msg>`
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty-printed JSON on stdout, printed even in quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Spinner on stderr, only for human output on a terminal.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet
            || self.resolved_format != OutputFormat::Human
            || !io::stderr().is_terminal()
        {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(msg.to_owned());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::AppConfig;

    fn make_manager(quiet: bool, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format: OutputFormat::Plain,
            log_file: None,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_writers_succeed_silently() {
        let out = make_manager(true, true);
        assert!(out.is_quiet());
        assert!(out.print("hello").is_ok());
        assert!(out.success("done").is_ok());
        assert!(out.spinner("working").is_hidden());
    }

    #[test]
    fn no_color_from_flag_or_config() {
        assert!(make_manager(false, false).supports_color());
        assert!(!make_manager(false, true).supports_color());

        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Plain,
            log_file: None,
        };
        let mut config = AppConfig::default();
        config.output.no_color = true;
        assert!(!OutputManager::new(&args, &config).supports_color());
    }

    #[test]
    fn config_format_applies_when_flag_is_auto() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
            log_file: None,
        };
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        assert_eq!(OutputManager::new(&args, &config).format(), OutputFormat::Json);
    }

    #[test]
    fn spinner_is_hidden_for_plain_output() {
        let out = make_manager(false, true);
        assert!(out.spinner("working").is_hidden());
    }

    #[test]
    fn explicit_flag_beats_config_format() {
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            output_format: OutputFormat::Plain,
            log_file: None,
        };
        assert_eq!(OutputManager::new(&args, &config).format(), OutputFormat::Plain);
    }
}
