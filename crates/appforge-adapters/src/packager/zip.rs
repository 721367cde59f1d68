//! Zip packager.
//!
//! Archives a finished scratch tree as `<destination>/<kebab name>.zip`.
//! Members are stored relative to the tree root with `/` separators, in
//! sorted order, with a fixed timestamp, so the same tree always produces the
//! same bytes. Every directory gets its own entry, empty ones included.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use appforge_core::{
    application::{ApplicationError, ports::{PackageReceipt, Packager}},
    domain::case,
    error::{ForgeError, ForgeResult},
};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;
use ::zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl ZipPackager {
    pub fn new() -> Self {
        Self
    }

    fn write_archive(&self, source_root: &Path, archive: &Path) -> ForgeResult<usize> {
        let file = File::create(archive).map_err(|e| failed(archive, e))?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut entries = 0;
        for entry in WalkDir::new(source_root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| failed(source_root, e))?;
            let Some(name) = member_name(source_root, entry.path()) else {
                continue;
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                zip.add_directory(format!("{name}/"), options.clone())
                    .map_err(|e| failed(archive, e))?;
            } else if file_type.is_file() {
                let bytes = fs::read(entry.path()).map_err(|e| failed(entry.path(), e))?;
                zip.start_file(name, options.clone()).map_err(|e| failed(archive, e))?;
                zip.write_all(&bytes).map_err(|e| failed(archive, e))?;
            } else {
                warn!(path = %entry.path().display(), "skipping non-regular file");
                continue;
            }
            entries += 1;
        }

        zip.finish().map_err(|e| failed(archive, e))?;
        Ok(entries)
    }
}

impl Packager for ZipPackager {
    fn archive_path(&self, display_name: &str, destination: &Path) -> PathBuf {
        let stem = case::kebab(display_name);
        let stem = if stem.is_empty() { "project".to_string() } else { stem };
        destination.join(format!("{stem}.zip"))
    }

    #[instrument(skip_all, fields(source = %source_root.display(), name = display_name))]
    fn package(
        &self,
        source_root: &Path,
        display_name: &str,
        destination: &Path,
    ) -> ForgeResult<PackageReceipt> {
        if !source_root.is_dir() {
            return Err(failed(source_root, "source directory does not exist"));
        }
        fs::create_dir_all(destination).map_err(|e| failed(destination, e))?;

        let archive_path = self.archive_path(display_name, destination);
        let entries = match self.write_archive(source_root, &archive_path) {
            Ok(entries) => entries,
            Err(e) => {
                if archive_path.exists() {
                    if let Err(rm) = fs::remove_file(&archive_path) {
                        warn!(
                            path = %archive_path.display(),
                            error = %rm,
                            "could not remove partial archive"
                        );
                    }
                }
                return Err(e);
            }
        };

        let size_bytes = fs::metadata(&archive_path)
            .map_err(|e| failed(&archive_path, e))?
            .len();
        debug!(entries, size_bytes, "archive written");
        info!(path = %archive_path.display(), "project packaged");

        Ok(PackageReceipt {
            archive_path,
            size_bytes,
            entries,
        })
    }
}

/// Relative `/`-joined member name; `None` for the root itself.
fn member_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn failed(path: &Path, reason: impl std::fmt::Display) -> ForgeError {
    ApplicationError::PackagingFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}
