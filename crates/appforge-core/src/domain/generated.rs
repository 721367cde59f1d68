use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::domain::{common::RelativePath, error::DomainError};

/// Where a file's content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileOrigin {
    /// Compiled from a named template.
    Template { name: String },
    /// Emitted as-is by a generator step.
    Verbatim,
}

/// One file of a generated tree. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    path: RelativePath,
    content: String,
    origin: FileOrigin,
}

impl GeneratedFile {
    pub fn templated(path: RelativePath, template: impl Into<String>, content: String) -> Self {
        Self {
            path,
            content,
            origin: FileOrigin::Template {
                name: template.into(),
            },
        }
    }

    pub fn verbatim(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: content.into(),
            origin: FileOrigin::Verbatim,
        }
    }

    pub fn path(&self) -> &RelativePath {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> &FileOrigin {
        &self.origin
    }

    pub fn is_templated(&self) -> bool {
        matches!(self.origin, FileOrigin::Template { .. })
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Ordered accumulator of generated files.
///
/// Produced by a generator run and flushed to the scratch directory once the
/// run completes. Insertion order is the order steps emitted files in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: Vec<GeneratedFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    pub fn with(mut self, file: GeneratedFile) -> Self {
        self.push(file);
        self
    }

    /// Append another set, keeping its order.
    pub fn extend(&mut self, other: FileSet) {
        self.files.extend(other.files);
    }

    /// No duplicate paths.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.path()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.files.iter().map(GeneratedFile::path)
    }

    /// Sorted path strings, the structural fingerprint of a run.
    pub fn path_set(&self) -> BTreeSet<String> {
        self.paths().map(RelativePath::to_slash_string).collect()
    }

    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path().to_slash_string() == path)
    }

    /// Every parent directory any file needs, shallowest first.
    pub fn directories(&self) -> BTreeSet<RelativePath> {
        let mut dirs = BTreeSet::new();
        for file in &self.files {
            let mut current = file.path().parent();
            while let Some(dir) = current {
                current = dir.parent();
                dirs.insert(dir);
            }
        }
        dirs
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(GeneratedFile::size).sum()
    }
}

impl IntoIterator for FileSet {
    type Item = GeneratedFile;
    type IntoIter = std::vec::IntoIter<GeneratedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl FromIterator<GeneratedFile> for FileSet {
    fn from_iter<I: IntoIterator<Item = GeneratedFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
