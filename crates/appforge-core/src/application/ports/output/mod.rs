//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `appforge-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ForgeResult;

/// Port for filesystem operations on the scratch tree.
///
/// Implemented by:
/// - `appforge_adapters::filesystem::LocalFilesystem` (production)
/// - `appforge_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories. Succeeds if it exists.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Write content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()>;
}

/// Port for template compilation.
///
/// A registry is a constructed value handed to each run; nothing is
/// registered globally. Compilation is pure: the same name and context always
/// produce the same text.
///
/// Implemented by:
/// - `appforge_adapters::renderer::HandlebarsRegistry`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRegistry: Send + Sync {
    /// Compile a named template. Fails with `TemplateError` for unknown
    /// templates, undefined variables and unknown helpers.
    fn compile(&self, name: &str, context: &serde_json::Value) -> ForgeResult<String>;

    /// Compile an inline template string (used for templated paths).
    fn compile_str(&self, source: &str, context: &serde_json::Value) -> ForgeResult<String>;

    fn has_template(&self, name: &str) -> bool;

    /// Registered template names, sorted.
    fn template_names(&self) -> Vec<String>;
}

/// What a packager reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReceipt {
    pub archive_path: PathBuf,
    pub size_bytes: u64,
    pub entries: usize,
}

/// Port for archiving a finished scratch tree.
///
/// The packager never validates the tree's structure; that is the
/// generators' job.
#[cfg_attr(test, mockall::automock)]
pub trait Packager: Send + Sync {
    /// Where `package` would write for this display name.
    fn archive_path(&self, display_name: &str, destination: &Path) -> PathBuf;

    /// Archive `source_root` into `destination`. Member paths are relative to
    /// `source_root`.
    fn package(
        &self,
        source_root: &Path,
        display_name: &str,
        destination: &Path,
    ) -> ForgeResult<PackageReceipt>;
}
