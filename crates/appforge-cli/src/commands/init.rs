//! `appforge init`: create a default configuration file and, optionally, a
//! sample descriptor.

use std::path::{Path, PathBuf};

use tracing::info;

use appforge_adapters::DescriptorFormat;
use appforge_core::domain::{
    ApiEndpoint, Column, ComponentKind, DatabaseSchema, DescriptorDocument, HttpMethod, Metadata,
    Parameter, Table, UiComponent,
};

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{AppConfig, LOCAL_CONFIG_FILE},
    commands::write_file,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Create a default appforge configuration file.
pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    output.info("Initialising configuration...")?;

    let config_path = target_path(&args, global.config.as_ref());

    // Existing config is left alone without --force.
    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
    } else {
        let toml =
            toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise default config: {e}"),
                source: Some(Box::new(e)),
            })?;
        write_file(&config_path, &toml)?;
        info!(path = %config_path.display(), "config written");
        output.success(&format!("Configuration created at {}", config_path.display()))?;
    }

    if let Some(example) = args.example {
        if example.exists() && !args.force {
            return Err(CliError::FileExists { path: example });
        }
        let content = render_example(&example)?;
        write_file(&example, &content)?;
        output.success(&format!("Sample descriptor written to {}", example.display()))?;
        output.print(&format!("  Try: appforge generate {}", example.display()))?;
    }

    Ok(())
}

/// `--config` wins, then `--local`, then the global location.
fn target_path(args: &InitArgs, explicit: Option<&PathBuf>) -> PathBuf {
    match explicit {
        Some(path) => path.clone(),
        None if args.local => PathBuf::from(LOCAL_CONFIG_FILE),
        None => AppConfig::config_path(),
    }
}

fn render_example(path: &Path) -> CliResult<String> {
    let document = sample_descriptor();
    let rendered = match DescriptorFormat::from_path(path) {
        DescriptorFormat::Toml => toml::to_string_pretty(&document).map_err(|e| e.to_string()),
        DescriptorFormat::Json => serde_json::to_string_pretty(&document)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| e.to_string()),
    };
    rendered.map_err(|reason| CliError::SampleEncoding { reason })
}

/// A small shop exercising every descriptor section.
pub fn sample_descriptor() -> DescriptorDocument {
    let column = |name: &str, type_tag: &str, nullable: bool| Column {
        name: name.into(),
        type_tag: type_tag.into(),
        nullable,
    };
    let param = |name: &str, type_tag: &str| Parameter {
        name: name.into(),
        type_tag: type_tag.into(),
    };

    DescriptorDocument {
        name: "Shop".into(),
        platform_identifier: Some("com.example.shop".into()),
        target: "android".into(),
        metadata: Some(Metadata {
            author: Some("Example Author".into()),
            description: Some("A small storefront".into()),
            version: Some("0.1.0".into()),
        }),
        database_schema: Some(DatabaseSchema {
            tables: vec![
                Table {
                    name: "products".into(),
                    columns: vec![
                        column("id", "integer", false),
                        column("title", "string", false),
                        column("unit_price", "decimal", false),
                        column("in_stock", "boolean", false),
                        column("released_at", "datetime", true),
                    ],
                },
                Table {
                    name: "order_items".into(),
                    columns: vec![
                        column("id", "integer", false),
                        column("product_id", "integer", false),
                        column("quantity", "integer", false),
                    ],
                },
            ],
        }),
        api_endpoints: Some(vec![
            ApiEndpoint {
                path: "/products".into(),
                method: HttpMethod::Get,
                parameters: Vec::new(),
                return_type: Some("Product[]".into()),
            },
            ApiEndpoint {
                path: "/products/{id}".into(),
                method: HttpMethod::Get,
                parameters: vec![param("id", "integer")],
                return_type: Some("Product".into()),
            },
            ApiEndpoint {
                path: "/orders".into(),
                method: HttpMethod::Post,
                parameters: vec![param("product_id", "integer"), param("quantity", "integer")],
                return_type: None,
            },
        ]),
        ui_components: Some(vec![
            UiComponent {
                name: "ProductList".into(),
                kind: ComponentKind::List,
            },
            UiComponent {
                name: "ProductDetail".into(),
                kind: ComponentKind::Detail,
            },
            UiComponent {
                name: "Checkout".into(),
                kind: ComponentKind::Form,
            },
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_adapters::descriptor_loader;
    use appforge_core::domain::ProjectDescriptor;

    fn init_args(local: bool) -> InitArgs {
        InitArgs {
            global: false,
            local,
            force: false,
            example: None,
        }
    }

    #[test]
    fn sample_descriptor_validates() {
        let descriptor = ProjectDescriptor::from_document(sample_descriptor()).unwrap();
        assert_eq!(descriptor.tables().len(), 2);
        assert!(descriptor.has_endpoints());
    }

    #[test]
    fn sample_renders_in_both_formats() {
        for name in ["shop.json", "shop.toml"] {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(name);
            std::fs::write(&path, render_example(&path).unwrap()).unwrap();
            let loaded = descriptor_loader::load_document(&path).unwrap();
            assert_eq!(loaded, sample_descriptor(), "{name}");
        }
    }

    #[test]
    fn explicit_config_path_wins() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(target_path(&init_args(true), Some(&explicit)), explicit);
        assert_eq!(
            target_path(&init_args(true), None),
            PathBuf::from(LOCAL_CONFIG_FILE)
        );
        assert_eq!(target_path(&init_args(false), None), AppConfig::config_path());
    }
}
