//! Implementation of the `appforge targets` command.

use serde::Serialize;

use appforge_adapters::HandlebarsRegistry;
use appforge_core::{
    application::{CatalogService, TargetInfo},
    domain::Target,
};

use crate::{
    cli::{ListFormat, OutputFormat, TargetsArgs, global::GlobalArgs},
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct TargetEntry {
    #[serde(flatten)]
    info: TargetInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    templates: Option<Vec<String>>,
}

pub fn execute(args: TargetsArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let service = CatalogService::new(Box::new(HandlebarsRegistry::from_environment()?));
    let entries = entries(&service, args.templates);

    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Supported targets:")?;
            for entry in &entries {
                let info = &entry.info;
                output.print(&format!(
                    "  {:<16} {:<14} {:<8} {}",
                    info.id, info.display_name, info.family, info.language
                ))?;
                for template in entry.templates.iter().flatten() {
                    output.print(&format!("      {template}"))?;
                }
            }
        }

        ListFormat::Json => output.json(&entries)?,

        ListFormat::List => {
            for entry in &entries {
                output.print(entry.info.id)?;
            }
        }

        ListFormat::Csv => {
            for line in csv_lines(&entries) {
                output.print(&line)?;
            }
        }
    }

    Ok(())
}

fn entries(service: &CatalogService, with_templates: bool) -> Vec<TargetEntry> {
    Target::ALL
        .into_iter()
        .map(|target| TargetEntry {
            info: TargetInfo::of(target),
            templates: with_templates.then(|| service.templates_for(target)),
        })
        .collect()
}

fn csv_lines(entries: &[TargetEntry]) -> Vec<String> {
    let mut lines = vec!["id,display_name,family,language,extension,steps".to_string()];
    for entry in entries {
        let info = &entry.info;
        lines.push(format!(
            "{},{},{},{},{},{}",
            info.id,
            csv_field(info.display_name),
            info.family,
            info.language,
            info.file_extension,
            info.steps.join(";")
        ));
    }
    lines
}

/// Quote a field that contains a separator or quote.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CatalogService {
        CatalogService::new(Box::new(HandlebarsRegistry::with_builtin().unwrap()))
    }

    #[test]
    fn lists_every_target_once() {
        let entries = entries(&service(), false);
        assert_eq!(entries.len(), Target::ALL.len());
        assert!(entries.iter().all(|e| e.templates.is_none()));
    }

    #[test]
    fn template_listing_is_per_target() {
        let entries = entries(&service(), true);
        let ios = entries.iter().find(|e| e.info.id == "ios").unwrap();
        let templates = ios.templates.as_ref().unwrap();
        assert!(!templates.is_empty());
        assert!(templates.iter().all(|t| !t.starts_with("android/")));
    }

    #[test]
    fn csv_has_header_and_one_row_per_target() {
        let lines = csv_lines(&entries(&service(), false));
        assert_eq!(lines.len(), Target::ALL.len() + 1);
        assert!(lines[0].starts_with("id,"));
        assert!(lines[1].starts_with("android,\"Android (Kotlin, Jetpack Compose)\","));
    }

    #[test]
    fn csv_field_quotes_separators() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn json_entries_flatten_target_info() {
        let value = serde_json::to_value(entries(&service(), false)).unwrap();
        assert_eq!(value[0]["id"], "android");
        assert!(value[0].get("displayName").is_some());
        assert!(value[0].get("templates").is_none());
    }
}
