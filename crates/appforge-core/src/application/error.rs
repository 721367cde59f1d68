//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A template referenced an undefined variable or helper, or does not
    /// exist. Always a generator defect, never caller input.
    #[error("Template '{template}' failed: {reason}")]
    TemplateError { template: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The packager could not archive the scratch tree.
    #[error("Packaging failed for {path}: {reason}")]
    PackagingFailed { path: PathBuf, reason: String },

    /// A per-run scratch directory unexpectedly already exists.
    #[error("Scratch directory already exists: {path}")]
    ScratchExists { path: PathBuf },

    /// The archive destination already holds a file of that name.
    #[error("Archive already exists at {path}")]
    ArchiveExists { path: PathBuf },

    /// A generator step thread panicked.
    #[error("Generator step '{step}' panicked")]
    StepPanicked { step: String },

    /// Cleanup of the scratch directory failed.
    #[error("Cleanup failed for {path}: {reason}")]
    CleanupFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TemplateError {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateError { template, .. } => vec![
                format!("Built-in template '{}' could not be rendered", template),
                "This is a generator bug, please report it with your descriptor".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure there is free disk space".into(),
            ],
            Self::PackagingFailed { path, .. } => vec![
                format!("Could not write archive under {}", path.display()),
                "Check the output directory is writable".into(),
            ],
            Self::ArchiveExists { path } => vec![
                format!("File already exists: {}", path.display()),
                "Use --force to overwrite".into(),
                "Or choose another output directory with --output".into(),
            ],
            Self::ScratchExists { path } => vec![
                format!("Remove {} and retry", path.display()),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateError { .. } | Self::StepPanicked { .. } => ErrorCategory::Internal,
            Self::FilesystemError { .. }
            | Self::PackagingFailed { .. }
            | Self::CleanupFailed { .. }
            | Self::ScratchExists { .. } => ErrorCategory::Io,
            Self::ArchiveExists { .. } => ErrorCategory::Validation,
        }
    }
}
