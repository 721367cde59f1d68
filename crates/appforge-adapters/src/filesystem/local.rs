//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use appforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ForgeError, ForgeResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ForgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_inside_created_directories() {
        let temp = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let dir = temp.path().join("src/models");
        fs.create_dir_all(&dir).unwrap();
        fs.write_file(&dir.join("User.ts"), "export {}").unwrap();
        assert!(fs.exists(&dir.join("User.ts")));
        assert_eq!(std::fs::read_to_string(dir.join("User.ts")).unwrap(), "export {}");

        fs.remove_dir_all(&temp.path().join("src")).unwrap();
        assert!(!fs.exists(&dir));
    }

    #[test]
    fn write_without_parent_reports_the_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing/file.txt");
        let err = LocalFilesystem::new().write_file(&path, "x").unwrap_err();
        match err {
            ForgeError::Application(ApplicationError::FilesystemError { path: p, reason }) => {
                assert_eq!(p, path);
                assert!(reason.starts_with("Failed to write file"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
