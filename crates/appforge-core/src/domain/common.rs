use super::DomainError;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to stay inside its root.
///
/// Invariant: never absolute, never contains `..`. Enforced at construction.
/// Generated trees and archive members are both keyed by this type, so the
/// packager can never be handed a path that escapes the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || path.has_root() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        if path.as_os_str().is_empty() {
            return Err(DomainError::InvalidPath {
                path: String::new(),
                reason: "path is empty".into(),
            });
        }
        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(DomainError::PathTraversal {
                        path: path.display().to_string(),
                    });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed {
                        path: path.display().to_string(),
                    });
                }
            }
        }
        Ok(Self(path))
    }

    /// Join a segment, maintaining the relative invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        Self::try_new(self.0.join(segment))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Parent directory, `None` for top-level entries.
    pub fn parent(&self) -> Option<RelativePath> {
        self.0
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| Self(p.to_path_buf()))
    }

    /// Path with `/` separators regardless of host platform.
    pub fn to_slash_string(&self) -> String {
        self.0
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Final component.
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn starts_with(&self, prefix: impl AsRef<Path>) -> bool {
        self.0.starts_with(prefix)
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.to_slash_string()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_slash_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_relative_paths() {
        let path = RelativePath::try_new("src/models/OrderItem.ts").unwrap();
        assert_eq!(path.to_slash_string(), "src/models/OrderItem.ts");
        assert_eq!(path.file_name(), "OrderItem.ts");
        assert_eq!(path.parent().unwrap().to_slash_string(), "src/models");
    }

    #[test]
    fn rejects_absolute_and_traversal() {
        assert!(matches!(
            RelativePath::try_new("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
        assert!(matches!(
            RelativePath::try_new("src/../../escape"),
            Err(DomainError::PathTraversal { .. })
        ));
        assert!(RelativePath::try_new("").is_err());
    }

    #[test]
    fn top_level_entry_has_no_parent() {
        let path = RelativePath::try_new("package.json").unwrap();
        assert!(path.parent().is_none());
    }

    #[test]
    fn keeps_spaces_in_components() {
        let path = RelativePath::try_new("Acme/Core Data/Acme.xcdatamodeld").unwrap();
        assert!(path.starts_with("Acme/Core Data"));
    }
}
