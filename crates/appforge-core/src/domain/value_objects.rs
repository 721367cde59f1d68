//! Domain value objects: Target, Language, ColumnType, HttpMethod.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Each
//! carries its string representation and a `FromStr` parser. Type mapping
//! (descriptor column type to a language's type name) lives on `Language`
//! so every generator for the same language emits the same names.
//!
//! # Adding a Target
//!
//! 1. Add the enum variant and its arms here
//! 2. Add a generator under `application::generators`
//! 3. Register it in `generators::for_target`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Target ───────────────────────────────────────────────────────────────────

/// A supported output platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    Android,
    Ios,
    ReactNative,
    Flutter,
    BackendExpress,
    BackendFastapi,
}

impl Target {
    pub const ALL: [Target; 6] = [
        Self::Android,
        Self::Ios,
        Self::ReactNative,
        Self::Flutter,
        Self::BackendExpress,
        Self::BackendFastapi,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::ReactNative => "react-native",
            Self::Flutter => "flutter",
            Self::BackendExpress => "backend-express",
            Self::BackendFastapi => "backend-fastapi",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Android => "Android (Kotlin, Jetpack Compose)",
            Self::Ios => "iOS (Swift, SwiftUI)",
            Self::ReactNative => "React Native (Expo, TypeScript)",
            Self::Flutter => "Flutter (Dart)",
            Self::BackendExpress => "Express API (TypeScript)",
            Self::BackendFastapi => "FastAPI (Python)",
        }
    }

    pub const fn language(&self) -> Language {
        match self {
            Self::Android => Language::Kotlin,
            Self::Ios => Language::Swift,
            Self::ReactNative | Self::BackendExpress => Language::TypeScript,
            Self::Flutter => Language::Dart,
            Self::BackendFastapi => Language::Python,
        }
    }

    pub const fn family(&self) -> TargetFamily {
        match self {
            Self::Android | Self::Ios => TargetFamily::NativeMobile,
            Self::ReactNative | Self::Flutter => TargetFamily::CrossPlatform,
            Self::BackendExpress | Self::BackendFastapi => TargetFamily::Backend,
        }
    }

    /// Component names whose screen file would overwrite one of the target's
    /// fixed entry files.
    pub const fn reserved_component_names(&self) -> &'static [&'static str] {
        match self {
            Self::ReactNative | Self::Flutter => &["Home"],
            Self::Ios => &["Content"],
            Self::Android | Self::BackendExpress | Self::BackendFastapi => &[],
        }
    }

    /// Comma-separated list of every target id, for error messages.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(Target::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "react-native" | "reactnative" | "rn" => Ok(Self::ReactNative),
            "flutter" => Ok(Self::Flutter),
            "backend-express" | "express" | "node-express" => Ok(Self::BackendExpress),
            "backend-fastapi" | "fastapi" | "python-fastapi" => Ok(Self::BackendFastapi),
            _ => Err(DomainError::UnsupportedTarget {
                target: s.to_string(),
                supported: Self::supported_list(),
            }),
        }
    }
}

/// Coarse grouping used by the target catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFamily {
    NativeMobile,
    CrossPlatform,
    Backend,
}

impl fmt::Display for TargetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NativeMobile => "native-mobile",
            Self::CrossPlatform => "cross-platform",
            Self::Backend => "backend",
        })
    }
}

// ── Language ─────────────────────────────────────────────────────────────────

/// Source language a target emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Kotlin,
    Swift,
    TypeScript,
    Dart,
    Python,
}

impl Language {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kotlin => "kotlin",
            Self::Swift => "swift",
            Self::TypeScript => "typescript",
            Self::Dart => "dart",
            Self::Python => "python",
        }
    }

    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::Kotlin => "kt",
            Self::Swift => "swift",
            Self::TypeScript => "ts",
            Self::Dart => "dart",
            Self::Python => "py",
        }
    }

    /// The language's generic string type; the fallback for unknown columns.
    pub const fn string_type(&self) -> &'static str {
        match self {
            Self::Kotlin | Self::Swift | Self::Dart => "String",
            Self::TypeScript => "string",
            Self::Python => "str",
        }
    }

    pub const fn void_type(&self) -> &'static str {
        match self {
            Self::Kotlin => "Unit",
            Self::Swift => "Void",
            Self::TypeScript | Self::Dart => "void",
            Self::Python => "None",
        }
    }

    /// Map a descriptor column type onto this language.
    pub fn type_name(&self, column_type: &ColumnType) -> &'static str {
        use ColumnType as C;
        match self {
            Self::Kotlin => match column_type {
                C::Integer => "Int",
                C::BigInt => "Long",
                C::Float => "Double",
                C::Decimal => "java.math.BigDecimal",
                C::Boolean => "Boolean",
                C::Date => "java.time.LocalDate",
                C::DateTime => "java.time.Instant",
                C::Uuid => "java.util.UUID",
                C::String | C::Text | C::Json | C::Other(_) => "String",
            },
            Self::Swift => match column_type {
                C::Integer => "Int",
                C::BigInt => "Int64",
                C::Float => "Double",
                C::Decimal => "Decimal",
                C::Boolean => "Bool",
                C::Date | C::DateTime => "Date",
                C::Uuid => "UUID",
                C::String | C::Text | C::Json | C::Other(_) => "String",
            },
            Self::TypeScript => match column_type {
                C::Integer | C::BigInt | C::Float | C::Decimal => "number",
                C::Boolean => "boolean",
                C::Json => "Record<string, unknown>",
                C::String | C::Text | C::Date | C::DateTime | C::Uuid | C::Other(_) => "string",
            },
            Self::Dart => match column_type {
                C::Integer | C::BigInt => "int",
                C::Float | C::Decimal => "double",
                C::Boolean => "bool",
                C::Date | C::DateTime => "DateTime",
                C::Json => "Map<String, dynamic>",
                C::String | C::Text | C::Uuid | C::Other(_) => "String",
            },
            Self::Python => match column_type {
                C::Integer | C::BigInt => "int",
                C::Float => "float",
                C::Decimal => "Decimal",
                C::Boolean => "bool",
                C::Date => "date",
                C::DateTime => "datetime",
                C::Uuid => "UUID",
                C::Json => "dict",
                C::String | C::Text | C::Other(_) => "str",
            },
        }
    }

    /// Wrap a type name in the language's optional form.
    pub fn optional(&self, type_name: &str) -> String {
        match self {
            Self::Kotlin | Self::Swift | Self::Dart => format!("{type_name}?"),
            Self::TypeScript => format!("{type_name} | null"),
            Self::Python => format!("Optional[{type_name}]"),
        }
    }

    /// Wrap a type name in the language's list form.
    pub fn list_of(&self, type_name: &str) -> String {
        match self {
            Self::Kotlin | Self::Dart => format!("List<{type_name}>"),
            Self::Swift => format!("[{type_name}]"),
            Self::TypeScript => format!("{type_name}[]"),
            Self::Python => format!("list[{type_name}]"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ColumnType ───────────────────────────────────────────────────────────────

/// Normalised descriptor column type.
///
/// Parsing never fails: unrecognised tags are kept as `Other` and map to the
/// target language's string type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Text,
    Integer,
    BigInt,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Uuid,
    Json,
    Other(String),
}

impl ColumnType {
    /// Parse a type tag. SQL-style size suffixes (`varchar(255)`) are ignored.
    pub fn parse(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase();
        let base = normalized
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        match base.as_str() {
            "string" | "str" | "varchar" | "char" => Self::String,
            "text" => Self::Text,
            "int" | "integer" | "smallint" | "int32" => Self::Integer,
            "bigint" | "long" | "int64" => Self::BigInt,
            "float" | "double" | "real" | "number" => Self::Float,
            "decimal" | "numeric" | "money" => Self::Decimal,
            "bool" | "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" | "timestamp" | "timestamptz" => Self::DateTime,
            "uuid" | "guid" => Self::Uuid,
            "json" | "jsonb" | "object" => Self::Json,
            _ => Self::Other(tag.trim().to_string()),
        }
    }

    /// Core Data attribute type name.
    pub const fn core_data_attribute(&self) -> &'static str {
        match self {
            Self::Integer => "Integer 32",
            Self::BigInt => "Integer 64",
            Self::Float => "Double",
            Self::Decimal => "Decimal",
            Self::Boolean => "Boolean",
            Self::Date | Self::DateTime => "Date",
            Self::Uuid => "UUID",
            Self::String | Self::Text | Self::Json | Self::Other(_) => "String",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

// ── HttpMethod ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub const fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            other => Err(DomainError::validation(
                "apiEndpoints.method",
                format!("unknown HTTP method '{other}'"),
            )),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_parses_ids_and_aliases() {
        assert_eq!("android".parse::<Target>().unwrap(), Target::Android);
        assert_eq!("RN".parse::<Target>().unwrap(), Target::ReactNative);
        assert_eq!("react_native".parse::<Target>().unwrap(), Target::ReactNative);
        assert_eq!("express".parse::<Target>().unwrap(), Target::BackendExpress);
        assert_eq!(
            "backend-fastapi".parse::<Target>().unwrap(),
            Target::BackendFastapi
        );
        for target in Target::ALL {
            assert_eq!(target.as_str().parse::<Target>().unwrap(), target);
        }
    }

    #[test]
    fn unknown_target_lists_supported() {
        let err = "symbian".parse::<Target>().unwrap_err();
        match err {
            DomainError::UnsupportedTarget { target, supported } => {
                assert_eq!(target, "symbian");
                assert!(supported.contains("backend-express"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decimal_maps_per_language() {
        let decimal = ColumnType::parse("decimal");
        assert_eq!(Language::TypeScript.type_name(&decimal), "number");
        assert_eq!(Language::Swift.type_name(&decimal), "Decimal");
        assert_eq!(Language::Python.type_name(&decimal), "Decimal");
        assert_eq!(Language::Kotlin.type_name(&decimal), "java.math.BigDecimal");
    }

    #[test]
    fn unknown_column_type_falls_back_to_string() {
        let geo = ColumnType::parse("geography");
        assert_eq!(geo, ColumnType::Other("geography".into()));
        assert!(!geo.is_recognized());
        for language in [
            Language::Kotlin,
            Language::Swift,
            Language::TypeScript,
            Language::Dart,
            Language::Python,
        ] {
            assert_eq!(language.type_name(&geo), language.string_type());
        }
    }

    #[test]
    fn column_type_ignores_size_suffix_and_case() {
        assert_eq!(ColumnType::parse("VARCHAR(255)"), ColumnType::String);
        assert_eq!(ColumnType::parse(" Timestamp "), ColumnType::DateTime);
    }

    #[test]
    fn optional_and_list_forms() {
        assert_eq!(Language::TypeScript.optional("string"), "string | null");
        assert_eq!(Language::Python.optional("int"), "Optional[int]");
        assert_eq!(Language::Swift.list_of("User"), "[User]");
        assert_eq!(Language::Kotlin.list_of("User"), "List<User>");
    }

    #[test]
    fn http_method_parses_case_insensitively() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert!(HttpMethod::Patch.has_body());
        assert!(!HttpMethod::Delete.has_body());
        assert!("FETCH".parse::<HttpMethod>().is_err());
    }
}
