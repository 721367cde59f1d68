// ============================================================================
// domain/error.rs - DESCRIPTOR AND GRAPH ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried across step threads)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid descriptor field '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Descriptor could not be read: {reason}")]
    InvalidDescriptor { reason: String },

    #[error("Duplicate path in generated tree: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes its root: {path}")]
    PathTraversal { path: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    // ========================================================================
    // Compatibility Errors (409-level equivalent)
    // ========================================================================
    #[error("Unsupported target '{target}' (supported: {supported})")]
    UnsupportedTarget { target: String, supported: String },

    // ========================================================================
    // Identifier Graph (generator defects)
    // ========================================================================
    #[error("Role '{role}' allocated twice")]
    DuplicateRole { role: String },

    #[error("Role '{role}' has no identifier in the symbol table")]
    UnresolvedRole { role: String },

    #[error("Identifier {token} is referenced but was never allocated")]
    DanglingReference { token: String },

    #[error("Identifier graph lock poisoned")]
    IdentifierGraphPoisoned,
}

impl DomainError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation { field, .. } if field == "platformIdentifier" => vec![
                "Set platformIdentifier explicitly, e.g. \"com.acme.shop\"".into(),
                "Package segments are lowercase and may not be Java or Kotlin keywords".into(),
            ],
            Self::Validation { field, .. } => vec![
                format!("Check the '{}' field of your descriptor", field),
                "Names must start with a letter and stay unique after case normalisation".into(),
            ],
            Self::InvalidDescriptor { .. } => vec![
                "Descriptors are JSON (.json) or TOML (.toml) documents".into(),
                "Try: appforge init --example descriptor.json".into(),
            ],
            Self::UnsupportedTarget { supported, .. } => vec![
                format!("Supported targets: {}", supported),
                "Try: appforge targets".into(),
            ],
            Self::DuplicateRole { .. }
            | Self::UnresolvedRole { .. }
            | Self::DanglingReference { .. }
            | Self::IdentifierGraphPoisoned => vec![
                "The generated project file would be inconsistent".into(),
                "This is a generator bug, please report it".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } | Self::InvalidDescriptor { .. } => ErrorCategory::Validation,
            Self::UnsupportedTarget { .. } => ErrorCategory::Compatibility,
            Self::UnresolvedRole { .. } | Self::DanglingReference { .. } => {
                ErrorCategory::NotFound
            }
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
