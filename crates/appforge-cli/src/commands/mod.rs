//! Command handlers, one module per subcommand.

use std::path::Path;

use crate::error::{CliResult, FileContext as _};

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod targets;

/// Write `content` to `path`, creating missing parent directories.
pub(crate) fn write_file(path: &Path, content: &str) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).at_path("Failed to create directory", parent)?;
        }
    }
    std::fs::write(path, content).at_path("Failed to write", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/config.toml");
        write_file(&path, "x = 1\n").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "x = 1\n");
    }
}
