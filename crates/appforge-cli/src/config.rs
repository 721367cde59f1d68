//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `APPFORGE_*` environment variables, `__` between nested keys
//!    (`APPFORGE_GENERATION__SEED=42`)
//! 3. Config file: `--config`, else `./.appforge.toml`, else the platform
//!    config directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use appforge_core::application::GenerationOptions;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// File name of a per-directory config.
pub const LOCAL_CONFIG_FILE: &str = ".appforge.toml";

const ENV_PREFIX: &str = "APPFORGE";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Generation settings.
    pub generation: GenerationConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Where archives go when `--output` is not given.
    pub output_dir: PathBuf,
    /// Parent of per-run scratch directories; the system temp dir if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
    /// Run independent generator steps concurrently.
    pub parallel_steps: bool,
    /// Fixed identifier seed for reproducible output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            scratch_dir: None,
            parallel_steps: false,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::active_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Options for the generation service, before CLI overrides.
    pub fn generation_options(&self) -> GenerationOptions {
        let mut options = GenerationOptions {
            parallel_steps: self.generation.parallel_steps,
            seed: self.generation.seed,
            ..GenerationOptions::default()
        };
        if let Some(dir) = &self.generation.scratch_dir {
            options.scratch_base = dir.clone();
        }
        options
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.appforge.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "appforge", "appforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file that [`load`](Self::load) reads when no `--config` is given.
    pub fn active_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local
        } else {
            Self::config_path()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_write_to_cwd() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.generation.output_dir, PathBuf::from("."));
        assert_eq!(cfg.output.format, "auto");
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(cfg.generation, GenerationConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generation]\nseed = 42\noutput_dir = \"dist\"\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.generation.seed, Some(42));
        assert_eq!(cfg.generation.output_dir, PathBuf::from("dist"));
        assert_eq!(cfg.output, OutputConfig::default());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }

    #[test]
    fn generation_options_follow_config() {
        let mut cfg = AppConfig::default();
        cfg.generation.scratch_dir = Some(PathBuf::from("/var/tmp/forge"));
        cfg.generation.seed = Some(3);
        let options = cfg.generation_options();
        assert_eq!(options.scratch_base, PathBuf::from("/var/tmp/forge"));
        assert_eq!(options.seed, Some(3));
        assert!(!options.overwrite);
    }

    #[test]
    fn config_path_is_non_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
