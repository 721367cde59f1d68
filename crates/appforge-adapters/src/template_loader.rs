//! Filesystem-based template loader.
//!
//! Discovers `.hbs` files under a directory and names each one by its path
//! relative to that directory, minus the suffix. The layout mirrors the
//! built-in set, so a directory can override individual templates:
//!
//! ```text
//! my-templates/
//! ├── common/
//! │   └── README.md.hbs         ← registered as "common/README.md"
//! └── express/
//!     └── index.ts.hbs          ← registered as "express/index.ts"
//! ```
//!
//! Files without the `.hbs` suffix are ignored.

use std::{
    fs,
    path::{Path, PathBuf},
};

use appforge_core::{application::ApplicationError, error::ForgeResult};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

const TEMPLATE_SUFFIX: &str = ".hbs";

/// Reads template sources from a directory tree.
///
/// ```rust,no_run
/// use appforge_adapters::template_loader::FilesystemTemplateLoader;
///
/// let loader = FilesystemTemplateLoader::new("./my-templates");
/// let templates = loader.load_all()?;
/// println!("Loaded {} templates", templates.len());
/// # Ok::<(), appforge_core::error::ForgeError>(())
/// ```
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    /// Create a loader pointed at `templates_dir`.
    ///
    /// The directory does not need to exist yet; [`load_all`](Self::load_all)
    /// returns an error if it is missing when called.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Load every `.hbs` file as `(name, source)`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::FilesystemError`] if `templates_dir` does
    /// not exist or cannot be walked. Individual files that cannot be read as
    /// UTF-8 are skipped with a `WARN` log.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> ForgeResult<Vec<(String, String)>> {
        if !self.templates_dir.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: self.templates_dir.clone(),
                reason: "templates directory not found".into(),
            }
            .into());
        }

        let mut templates = Vec::new();
        for entry in WalkDir::new(&self.templates_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: self.templates_dir.clone(),
                reason: format!("failed to walk templates directory: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = template_name(&self.templates_dir, entry.path()) else {
                continue;
            };
            match fs::read_to_string(entry.path()) {
                Ok(source) => {
                    debug!(name = %name, "loaded template");
                    templates.push((name, source));
                }
                Err(e) => {
                    warn!(
                        path  = %entry.path().display(),
                        error = %e,
                        "skipping unreadable template"
                    );
                }
            }
        }

        templates.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(count = templates.len(), "finished loading templates");
        Ok(templates)
    }
}

/// `root/express/index.ts.hbs` → `express/index.ts`; `None` for other files.
fn template_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    joined
        .strip_suffix(TEMPLATE_SUFFIX)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_core::error::ForgeError;
    use tempfile::TempDir;

    fn make_dir(files: &[(&str, &[u8])]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel_path, content) in files {
            let full = temp.path().join(rel_path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        temp
    }

    #[test]
    fn missing_dir_is_a_filesystem_error() {
        let loader = FilesystemTemplateLoader::new("/absolutely/does/not/exist");
        assert!(matches!(
            loader.load_all(),
            Err(ForgeError::Application(ApplicationError::FilesystemError { .. }))
        ));
    }

    #[test]
    fn names_are_relative_slash_paths_without_suffix() {
        let temp = make_dir(&[
            ("express/index.ts.hbs", b"index"),
            ("common/README.md.hbs", b"readme"),
            ("android/res/values/strings.xml.hbs", b"strings"),
        ]);
        let loaded = FilesystemTemplateLoader::new(temp.path()).load_all().unwrap();
        let names: Vec<&str> = loaded.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["android/res/values/strings.xml", "common/README.md", "express/index.ts"]
        );
        assert_eq!(loaded[2].1, "index");
    }

    #[test]
    fn other_files_are_ignored() {
        let temp = make_dir(&[("notes.txt", b"x"), (".hbs", b"x"), ("ok.hbs", b"y")]);
        let loaded = FilesystemTemplateLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(loaded, vec![("ok".to_string(), "y".to_string())]);
    }

    #[test]
    fn non_utf8_files_are_skipped() {
        let temp = make_dir(&[("bad.hbs", &[0xff, 0xfe, 0x00]), ("good.hbs", b"g")]);
        let loaded = FilesystemTemplateLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, "good");
    }

    #[test]
    fn empty_dir_loads_nothing() {
        let temp = TempDir::new().unwrap();
        assert!(FilesystemTemplateLoader::new(temp.path()).load_all().unwrap().is_empty());
    }
}
