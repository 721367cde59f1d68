use crate::domain::{error::DomainError, generated::FileSet};

/// Java and Kotlin hard keywords plus literals; none may name a package
/// segment.
const PACKAGE_KEYWORDS: &[&str] = &[
    "abstract", "as", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "fun", "goto", "if", "implements", "import", "in", "instanceof",
    "int", "interface", "is", "long", "native", "new", "null", "object", "package", "private",
    "protected", "public", "return", "short", "static", "strictfp", "super", "switch",
    "synchronized", "this", "throw", "throws", "transient", "true", "try", "typealias", "typeof",
    "val", "var", "void", "volatile", "when", "while",
];

/// Platform-specific checks that only some generators need.
///
/// Descriptor-wide rules live in `ProjectDescriptor::from_document`; these
/// are run by the mandatory manifest steps of the targets that care.
pub struct DomainValidator;

impl DomainValidator {
    /// Java/Kotlin package name: two or more dot-separated segments, each a
    /// lowercase letter followed by lowercase letters, digits or `_`, and
    /// none a language keyword.
    pub fn validate_package_name(id: &str) -> Result<(), DomainError> {
        let segments: Vec<&str> = id.split('.').collect();
        if segments.len() < 2 {
            return Err(DomainError::validation(
                "platformIdentifier",
                format!("'{id}' needs at least two segments (e.g. com.example.app)"),
            ));
        }
        for segment in segments {
            let mut chars = segment.chars();
            let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                return Err(DomainError::validation(
                    "platformIdentifier",
                    format!("'{segment}' is not a valid package segment in '{id}'"),
                ));
            }
            if PACKAGE_KEYWORDS.contains(&segment) {
                return Err(DomainError::validation(
                    "platformIdentifier",
                    format!(
                        "'{segment}' is a reserved word and cannot be a package segment in '{id}'"
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Apple bundle identifier: two or more dot-separated segments of ASCII
    /// alphanumerics and `-`.
    pub fn validate_bundle_identifier(id: &str) -> Result<(), DomainError> {
        let segments: Vec<&str> = id.split('.').collect();
        let valid = segments.len() >= 2
            && segments.iter().all(|s| {
                !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            });
        if valid {
            Ok(())
        } else {
            Err(DomainError::validation(
                "platformIdentifier",
                format!("'{id}' is not a valid bundle identifier (e.g. com.example.App)"),
            ))
        }
    }

    pub fn validate_file_set(files: &FileSet) -> Result<(), DomainError> {
        files.validate()
    }
}
