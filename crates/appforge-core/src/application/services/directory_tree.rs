//! Directory skeleton creation.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::ports::{Filesystem, TemplateRegistry},
    domain::RelativePath,
    error::ForgeResult,
};

/// Ensures a list of (possibly templated) relative directories exists under
/// a root. Running it twice leaves the filesystem unchanged.
pub struct DirectoryTreeBuilder<'a> {
    filesystem: &'a dyn Filesystem,
    registry: &'a dyn TemplateRegistry,
}

impl<'a> DirectoryTreeBuilder<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, registry: &'a dyn TemplateRegistry) -> Self {
        Self {
            filesystem,
            registry,
        }
    }

    /// Render each entry against `data`, validate it, and create it.
    ///
    /// Entries without `{{` are used as-is. Absolute or `..` entries are
    /// rejected before anything is created.
    #[instrument(skip_all, fields(root = %root.display(), count = paths.len()))]
    pub fn ensure<S: AsRef<str>>(
        &self,
        paths: &[S],
        root: &Path,
        data: &serde_json::Value,
    ) -> ForgeResult<Vec<RelativePath>> {
        let resolved = self.resolve(paths, data)?;
        for dir in &resolved {
            self.filesystem.create_dir_all(&root.join(dir))?;
        }
        debug!(created = resolved.len(), "directory skeleton ensured");
        Ok(resolved)
    }

    /// Render and validate without touching the filesystem.
    pub fn resolve<S: AsRef<str>>(
        &self,
        paths: &[S],
        data: &serde_json::Value,
    ) -> ForgeResult<Vec<RelativePath>> {
        paths
            .iter()
            .map(|raw| -> ForgeResult<RelativePath> {
                let raw = raw.as_ref();
                let rendered = if raw.contains("{{") {
                    self.registry.compile_str(raw, data)?
                } else {
                    raw.to_string()
                };
                Ok(RelativePath::try_new(rendered)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockTemplateRegistry};
    use crate::domain::DomainError;
    use crate::error::ForgeError;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn registry() -> MockTemplateRegistry {
        let mut registry = MockTemplateRegistry::new();
        registry
            .expect_compile_str()
            .returning(|source, _| Ok(source.replace("{{project.pascal}}", "Acme")));
        registry
    }

    #[test]
    fn renders_templated_entries_and_creates_them() {
        let registry = registry();
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all()
            .with(eq(PathBuf::from("/scratch/Acme/Models")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_create_dir_all()
            .with(eq(PathBuf::from("/scratch/Acme/Core Data")))
            .times(1)
            .returning(|_| Ok(()));

        let builder = DirectoryTreeBuilder::new(&fs, &registry);
        let created = builder
            .ensure(
                &["{{project.pascal}}/Models", "{{project.pascal}}/Core Data"],
                Path::new("/scratch"),
                &serde_json::json!({}),
            )
            .unwrap();
        assert_eq!(created.len(), 2);
    }

    #[test]
    fn rejects_traversal_before_creating_anything() {
        let registry = registry();
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().never();

        let builder = DirectoryTreeBuilder::new(&fs, &registry);
        let err = builder
            .ensure(&["src", "../outside"], Path::new("/scratch"), &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Domain(DomainError::PathTraversal { .. })
        ));
    }
}
