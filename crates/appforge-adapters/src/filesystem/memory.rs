//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use appforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ForgeError, ForgeResult},
};

/// In-memory filesystem. Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content.
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All directory paths, sorted. Ancestors of created directories are
    /// included.
    pub fn list_directories(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) -> ForgeResult<()> {
        let mut inner = self.write()?;
        inner.files.clear();
        inner.directories.clear();
        Ok(())
    }

    fn read(&self) -> ForgeResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> ForgeResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> ForgeError {
    ForgeError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "A file already exists at this path".into(),
            }
            .into());
        }

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        let mut inner = self.write()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Directory does not exist".into(),
            }
            .into());
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}
