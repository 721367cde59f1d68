//! The project descriptor: what to generate.
//!
//! A [`DescriptorDocument`] is the raw, permissive shape read from JSON or
//! TOML. [`ProjectDescriptor::from_document`] validates it once; every
//! generator downstream relies on the guarantees below and never re-checks.
//!
//! - the target is one of [`Target::ALL`]
//! - the project name is non-empty and `pascal(name)` is an identifier
//! - table names stay unique and valid after `pascal`, column names after
//!   `camel` within their table
//! - endpoint paths start with `/` and derived operation names are unique
//! - component names stay unique and valid after `pascal`

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::case;
use super::error::DomainError;
use super::value_objects::{ColumnType, HttpMethod, Target};

// ============================================================================
// Raw document
// ============================================================================

/// Input document as supplied by the caller. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptorDocument {
    pub name: String,
    pub platform_identifier: Option<String>,
    pub target: String,
    pub metadata: Option<Metadata>,
    pub database_schema: Option<DatabaseSchema>,
    pub api_endpoints: Option<Vec<ApiEndpoint>>,
    pub ui_components: Option<Vec<UiComponent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub author: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSchema {
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default = "default_type_tag")]
    pub type_tag: String,
    #[serde(default)]
    pub nullable: bool,
}

impl Column {
    pub fn column_type(&self) -> ColumnType {
        ColumnType::parse(&self.type_tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    pub path: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default = "default_type_tag")]
    pub type_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiComponent {
    pub name: String,
    #[serde(default)]
    pub kind: ComponentKind,
}

/// Body shape of a generated screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    #[default]
    Screen,
    List,
    Form,
    Detail,
}

impl ComponentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::List => "list",
            Self::Form => "form",
            Self::Detail => "detail",
        }
    }
}

fn default_type_tag() -> String {
    "string".to_string()
}

// ============================================================================
// Endpoint path analysis
// ============================================================================

/// One `/`-separated piece of an endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Static(&'a str),
    /// `{id}` or `:id`
    Param(&'a str),
}

impl ApiEndpoint {
    pub fn segments(&self) -> impl Iterator<Item = PathSegment<'_>> {
        self.path.split('/').filter(|s| !s.is_empty()).map(|s| {
            if let Some(inner) = s.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
                PathSegment::Param(inner)
            } else if let Some(inner) = s.strip_prefix(':') {
                PathSegment::Param(inner)
            } else {
                PathSegment::Static(s)
            }
        })
    }

    pub fn path_params(&self) -> Vec<&str> {
        self.segments()
            .filter_map(|s| match s {
                PathSegment::Param(p) => Some(p),
                PathSegment::Static(_) => None,
            })
            .collect()
    }

    /// Static segments, skipping an `api` prefix and version segments (`v1`).
    fn meaningful_statics(&self) -> Vec<&str> {
        self.segments()
            .filter_map(|s| match s {
                PathSegment::Static(p) if !is_prefix_segment(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Grouping key for backend route modules: the first meaningful static
    /// segment, or `root`.
    pub fn resource(&self) -> String {
        self.meaningful_statics()
            .first()
            .map(|s| case::camel(s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "root".to_string())
    }

    /// `GET /api/users/{id}` → `getUsersById`.
    pub fn operation_name(&self) -> String {
        let mut name = self.method.as_str().to_ascii_lowercase();
        let statics = self.meaningful_statics();
        if statics.is_empty() {
            name.push_str("Root");
        }
        for segment in statics {
            name.push_str(&case::pascal(segment));
        }
        let params = self.path_params();
        for (idx, param) in params.iter().enumerate() {
            name.push_str(if idx == 0 { "By" } else { "And" });
            name.push_str(&case::pascal(param));
        }
        name
    }
}

fn is_prefix_segment(segment: &str) -> bool {
    if segment.eq_ignore_ascii_case("api") {
        return true;
    }
    let mut chars = segment.chars();
    matches!(chars.next(), Some('v' | 'V'))
        && segment.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

// ============================================================================
// Validated descriptor
// ============================================================================

/// Validated, immutable project descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDescriptor {
    name: String,
    platform_identifier: Option<String>,
    target: Target,
    metadata: Metadata,
    tables: Vec<Table>,
    endpoints: Vec<ApiEndpoint>,
    components: Vec<UiComponent>,
}

impl ProjectDescriptor {
    /// Validate a raw document.
    ///
    /// The target is checked first so an unsupported selection is reported
    /// as such even when other fields are also wrong.
    pub fn from_document(doc: DescriptorDocument) -> Result<Self, DomainError> {
        let target: Target = doc.target.parse()?;

        let name = doc.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        if !case::is_identifier(&case::pascal(&name)) {
            return Err(DomainError::validation(
                "name",
                format!("'{name}' does not form a valid type name"),
            ));
        }

        let platform_identifier = match doc.platform_identifier {
            Some(id) if id.trim().is_empty() => {
                return Err(DomainError::validation(
                    "platformIdentifier",
                    "must not be empty when present",
                ));
            }
            Some(id) => Some(id.trim().to_string()),
            None => None,
        };

        let tables = doc.database_schema.map(|s| s.tables).unwrap_or_default();
        validate_tables(&tables)?;

        let endpoints = doc.api_endpoints.unwrap_or_default();
        validate_endpoints(&endpoints)?;

        let components = doc.ui_components.unwrap_or_default();
        validate_unique_names(
            "uiComponents",
            components.iter().map(|c| c.name.as_str()),
            case::pascal,
        )?;
        for component in &components {
            let normalized = case::pascal(&component.name);
            if target.reserved_component_names().contains(&normalized.as_str()) {
                return Err(DomainError::validation(
                    "uiComponents",
                    format!(
                        "'{}' is reserved by the {target} target; pick another component name",
                        component.name
                    ),
                ));
            }
        }

        Ok(Self {
            name,
            platform_identifier,
            target,
            metadata: doc.metadata.unwrap_or_default(),
            tables,
            endpoints,
            components,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `pascal(name)`: type, module and product name.
    pub fn product_name(&self) -> String {
        case::pascal(&self.name)
    }

    /// `kebab(name)`: package and archive slug.
    pub fn slug(&self) -> String {
        case::kebab(&self.name)
    }

    pub fn platform_identifier(&self) -> Option<&str> {
        self.platform_identifier.as_deref()
    }

    /// Platform identifier, or `com.example.<name>` when absent.
    ///
    /// Not validated here; the Android and iOS generators check the result
    /// against their own identifier rules.
    pub fn platform_identifier_or_default(&self) -> String {
        match &self.platform_identifier {
            Some(id) => id.clone(),
            None => format!("com.example.{}", case::snake(&self.name).replace('_', "")),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn endpoints(&self) -> &[ApiEndpoint] {
        &self.endpoints
    }

    pub fn components(&self) -> &[UiComponent] {
        &self.components
    }

    pub fn has_schema(&self) -> bool {
        !self.tables.is_empty()
    }

    pub fn has_endpoints(&self) -> bool {
        !self.endpoints.is_empty()
    }

    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }
}

impl TryFrom<DescriptorDocument> for ProjectDescriptor {
    type Error = DomainError;

    fn try_from(doc: DescriptorDocument) -> Result<Self, Self::Error> {
        Self::from_document(doc)
    }
}

fn validate_tables(tables: &[Table]) -> Result<(), DomainError> {
    validate_unique_names(
        "databaseSchema.tables",
        tables.iter().map(|t| t.name.as_str()),
        case::pascal,
    )?;
    for table in tables {
        validate_unique_names(
            &format!("databaseSchema.tables.{}.columns", table.name),
            table.columns.iter().map(|c| c.name.as_str()),
            case::camel,
        )?;
    }
    Ok(())
}

fn validate_endpoints(endpoints: &[ApiEndpoint]) -> Result<(), DomainError> {
    let mut operations = HashSet::new();
    for endpoint in endpoints {
        if !endpoint.path.starts_with('/') {
            return Err(DomainError::validation(
                "apiEndpoints.path",
                format!("'{}' must start with '/'", endpoint.path),
            ));
        }
        for param in endpoint.path_params() {
            if !case::is_identifier(&case::camel(param)) {
                return Err(DomainError::validation(
                    "apiEndpoints.path",
                    format!("'{param}' in '{}' is not a valid parameter name", endpoint.path),
                ));
            }
        }
        validate_unique_names(
            &format!("apiEndpoints.{}.parameters", endpoint.path),
            endpoint.parameters.iter().map(|p| p.name.as_str()),
            case::camel,
        )?;
        let operation = endpoint.operation_name();
        if !operations.insert(operation.clone()) {
            return Err(DomainError::validation(
                "apiEndpoints",
                format!(
                    "{} {} duplicates operation '{operation}'",
                    endpoint.method, endpoint.path
                ),
            ));
        }
    }
    Ok(())
}

/// Every name must be a valid identifier after `normalize`, and no two names
/// may collide after it.
fn validate_unique_names<'a>(
    field: &str,
    names: impl Iterator<Item = &'a str>,
    normalize: fn(&str) -> String,
) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for raw in names {
        let normalized = normalize(raw);
        if !case::is_identifier(&normalized) {
            return Err(DomainError::validation(
                field,
                format!("'{raw}' is not a valid identifier"),
            ));
        }
        if !seen.insert(normalized.clone()) {
            return Err(DomainError::validation(
                field,
                format!("'{raw}' collides with another name as '{normalized}'"),
            ));
        }
    }
    Ok(())
}
