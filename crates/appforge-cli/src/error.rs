//! Errors surfaced by the `appforge` binary.
//!
//! Every failure ends up as a [`CliError`]: core and adapter failures arrive
//! wrapped in [`CliError::Core`], the rest originate in command handlers.
//! [`CliError::render`] produces the text written to stderr and
//! [`CliError::exit_code`] the process status.

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use thiserror::Error;

use appforge_core::error::{ErrorCategory as CoreCategory, ForgeError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// The descriptor path given to `generate` does not exist.
    #[error("Descriptor not found: {path}")]
    DescriptorNotFound { path: PathBuf },

    /// `init --example` would replace an existing file.
    #[error("File already exists at {path}")]
    FileExists { path: PathBuf },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// Descriptor, generation or packaging failure from the library crates.
    #[error("Generation failed: {0}")]
    Core(#[from] ForgeError),

    /// Reading or writing a file the CLI manages itself.
    #[error("{action} '{}'", .path.display())]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// stdout or stderr went away mid-command.
    #[error("Could not write to the terminal")]
    Terminal(#[from] io::Error),

    #[error("Could not encode the sample descriptor: {reason}")]
    SampleEncoding { reason: String },

    #[error("Could not read the confirmation answer")]
    Prompt {
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    /// Built without a cargo feature the command needs.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl CliError {
    /// Next steps shown under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DescriptorNotFound { path } => vec![
                format!("No file at '{}'", path.display()),
                "Create a sample with: appforge init --local --example app.json".into(),
            ],
            Self::FileExists { path } => vec![
                format!("'{}' already exists", path.display()),
                "Use --force to overwrite".into(),
            ],
            Self::ConfigError { .. } => vec![
                "Show the active file with: appforge config path".into(),
                "Recreate it with: appforge init --force".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::File { path, .. } => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                vec![format!("Check that '{}' is writable by the current user", dir.display())]
            }
            Self::Terminal(_) => {
                vec!["Redirect output to a file with --output-format json".into()]
            }
            Self::SampleEncoding { .. } => {
                vec!["Try the other format: appforge init --example app.json".into()]
            }
            Self::Prompt { .. } | Self::FeatureNotAvailable { .. } => {
                let mut hints = vec!["Pass --yes to generate without a prompt".into()];
                if let Self::FeatureNotAvailable { feature } = self {
                    hints.push(format!(
                        "Or reinstall with: cargo install appforge-cli --features {feature}"
                    ));
                }
                hints
            }
            Self::Cancelled => vec!["Nothing was written".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileExists { .. } | Self::Cancelled | Self::Prompt { .. } => {
                ErrorCategory::UserError
            }
            Self::DescriptorNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Compatibility => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Io | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::File { .. } | Self::Terminal(_) | Self::SampleEncoding { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// Exit status: 2 user error, 3 not found, 4 configuration, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// The stderr report: message, cause chain when `verbose`, suggestions.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let mut out = if color {
            format!("\n{} {}\n", "✗ Error:".red().bold(), self.to_string().red())
        } else {
            format!("\nError: {self}\n")
        };

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                if color {
                    out.push_str(&format!("  {}\n", format!("Caused by: {err}").dimmed()));
                } else {
                    out.push_str(&format!("  Caused by: {err}\n"));
                }
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let title = "Suggestions:";
            if color {
                out.push_str(&format!("\n{}\n", title.yellow().bold()));
            } else {
                out.push_str(&format!("\n{title}\n"));
            }
            for line in suggestions {
                out.push_str(&format!("  {line}\n"));
            }
        }

        if !verbose {
            out.push_str("\nRe-run with -v to see the underlying cause.\n");
        }
        out
    }

    /// Record the failure in the log before it is printed.
    pub fn log(&self) {
        let code = self.exit_code();
        if code == 2 || code == 3 {
            tracing::warn!(exit_code = code, "{self}");
        } else {
            tracing::error!(exit_code = code, "{self}");
        }
        if let Some(cause) = self.source() {
            tracing::debug!(%cause, "caused by");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

/// Attach the file and the attempted action to an I/O failure.
pub trait FileContext<T> {
    fn at_path(self, action: &'static str, path: &Path) -> CliResult<T>;
}

impl<T> FileContext<T> for io::Result<T> {
    fn at_path(self, action: &'static str, path: &Path) -> CliResult<T> {
        self.map_err(|source| CliError::File {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}
