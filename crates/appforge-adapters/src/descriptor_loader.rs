//! Descriptor file loading.
//!
//! A descriptor is a JSON or TOML document; the format is chosen by file
//! extension (`.toml` is TOML, anything else is JSON). Parse failures surface
//! as [`DomainError::InvalidDescriptor`] so they are reported as user input
//! problems, not I/O failures.

use std::{fs, path::Path};

use appforge_core::{
    application::ApplicationError,
    domain::{DescriptorDocument, DomainError, ProjectDescriptor},
    error::ForgeResult,
};
use tracing::{debug, instrument};

/// Serialisation format of a descriptor document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Json,
    Toml,
}

impl DescriptorFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Read and parse a descriptor file without validating it.
#[instrument(fields(path = %path.display()))]
pub fn load_document(path: &Path) -> ForgeResult<DescriptorDocument> {
    let content = fs::read_to_string(path).map_err(|e| ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to read descriptor: {e}"),
    })?;
    let format = DescriptorFormat::from_path(path);
    debug!(?format, bytes = content.len(), "descriptor read");
    Ok(parse_document(&content, format)?)
}

/// Read, parse and validate a descriptor file.
pub fn load(path: &Path) -> ForgeResult<ProjectDescriptor> {
    let document = load_document(path)?;
    Ok(ProjectDescriptor::from_document(document)?)
}

pub fn parse_document(
    content: &str,
    format: DescriptorFormat,
) -> Result<DescriptorDocument, DomainError> {
    match format {
        DescriptorFormat::Json => serde_json::from_str(content).map_err(|e| {
            DomainError::InvalidDescriptor {
                reason: format!("invalid JSON: {e}"),
            }
        }),
        DescriptorFormat::Toml => toml::from_str(content).map_err(|e| {
            DomainError::InvalidDescriptor {
                reason: format!("invalid TOML: {}", e.message()),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_core::domain::Target;
    use appforge_core::error::ForgeError;

    const TOML_DESCRIPTOR: &str = r#"
name = "Acme"
target = "backend-fastapi"

[[databaseSchema.tables]]
name = "order_item"
columns = [{ name = "unit_price", type = "decimal" }]

[[apiEndpoints]]
path = "/api/orders"
method = "GET"
"#;

    #[test]
    fn format_follows_extension() {
        assert_eq!(DescriptorFormat::from_path(Path::new("a.toml")), DescriptorFormat::Toml);
        assert_eq!(DescriptorFormat::from_path(Path::new("a.TOML")), DescriptorFormat::Toml);
        assert_eq!(DescriptorFormat::from_path(Path::new("a.json")), DescriptorFormat::Json);
        assert_eq!(DescriptorFormat::from_path(Path::new("descriptor")), DescriptorFormat::Json);
    }

    #[test]
    fn parses_toml_with_camel_case_keys() {
        let doc = parse_document(TOML_DESCRIPTOR, DescriptorFormat::Toml).unwrap();
        assert_eq!(doc.name, "Acme");
        assert_eq!(doc.database_schema.unwrap().tables[0].columns[0].type_tag, "decimal");
        assert_eq!(doc.api_endpoints.unwrap().len(), 1);
    }

    #[test]
    fn malformed_json_is_invalid_descriptor() {
        let err = parse_document("{ name: ", DescriptorFormat::Json).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDescriptor { .. }));
    }

    #[test]
    fn load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("acme.toml");
        fs::write(&good, TOML_DESCRIPTOR).unwrap();
        let descriptor = load(&good).unwrap();
        assert_eq!(descriptor.target(), Target::BackendFastapi);

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{ "name": "Acme", "target": "windows-phone" }"#).unwrap();
        assert!(matches!(
            load(&bad).unwrap_err(),
            ForgeError::Domain(DomainError::UnsupportedTarget { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_filesystem_error() {
        let err = load_document(Path::new("/no/such/descriptor.json")).unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
