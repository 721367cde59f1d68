//! `appforge config`: read and write configuration values.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    cli::{ConfigCommands, GlobalArgs, OutputFormat},
    config::AppConfig,
    commands::write_file,
    error::{CliError, CliResult, FileContext as _},
    output::OutputManager,
};

/// Keys accepted by `get` and `set`.
pub const KEYS: &[&str] = &[
    "generation.output_dir",
    "generation.scratch_dir",
    "generation.parallel_steps",
    "generation.seed",
    "output.no_color",
    "output.format",
];

/// Dispatch to the correct config subcommand.
#[instrument(skip_all)]
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::Set { key, value } => {
            let path = file_path(&global);
            set_config_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                output.json(&config)?;
            } else {
                output.header("Current Configuration:")?;
                output.print(&to_toml(&config)?)?;
            }
        }

        ConfigCommands::Path => {
            output.print(&file_path(&global).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn file_path(global: &GlobalArgs) -> PathBuf {
    global.config.clone().unwrap_or_else(AppConfig::active_path)
}

fn check_key(key: &str) -> CliResult<()> {
    if KEYS.contains(&key) {
        Ok(())
    } else {
        Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}' (known: {})", KEYS.join(", ")),
            source: None,
        })
    }
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    check_key(key)?;
    let value = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    let pointer = format!("/{}", key.replace('.', "/"));
    Ok(match value.pointer(&pointer) {
        None | Some(serde_json::Value::Null) => "(unset)".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    })
}

/// Update one key in the file at `path`, creating the file if needed.
///
/// The edited document must still deserialise as an [`AppConfig`];
/// otherwise nothing is written.
fn set_config_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    check_key(key)?;

    let mut table: toml::Table = if path.is_file() {
        let text = std::fs::read_to_string(path).at_path("Failed to read", path)?;
        text.parse().map_err(|e: toml::de::Error| CliError::ConfigError {
            message: format!("Invalid TOML in {}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let Some((section, field)) = key.split_once('.') else {
        return Err(CliError::ConfigError {
            message: format!("Config key '{key}' has no section"),
            source: None,
        });
    };
    let entry = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(section_table) = entry else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' is not a table in {}", path.display()),
            source: None,
        });
    };
    section_table.insert(field.to_string(), parse_value(raw));

    let updated: AppConfig = toml::Value::Table(table.clone())
        .try_into()
        .map_err(|e: toml::de::Error| CliError::ConfigError {
            message: format!("Invalid value for {key}: '{raw}'"),
            source: Some(Box::new(e)),
        })?;
    debug!(key, ?updated, "config validated");

    let text = toml::to_string_pretty(&table).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    write_file(path, &text)
}

/// Booleans and integers keep their type; anything else is a string.
fn parse_value(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        toml::Value::Boolean(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        toml::Value::Integer(i)
    } else {
        toml::Value::String(raw.to_string())
    }
}

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
