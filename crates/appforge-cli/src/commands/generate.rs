//! Implementation of the `appforge generate` command.
//!
//! Responsibility: load the descriptor, apply CLI overrides, call the core
//! generation service, and display results. No generation logic lives here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use appforge_adapters::{
    HandlebarsRegistry, LocalFilesystem, MemoryFilesystem, ZipPackager, descriptor_loader,
};
use appforge_core::{
    application::{GenerationOptions, GenerationReport, GenerationService, Packager as _},
    domain::{DescriptorDocument, ProjectDescriptor},
    error::ForgeError,
};

use crate::{
    cli::{GenerateArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Machine-readable result of a packaged run.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    report: &'a GenerationReport,
}

/// Machine-readable result of a dry run.
#[derive(Debug, Serialize)]
struct JsonPreview<'a> {
    generated_at: String,
    dry_run: bool,
    project: &'a str,
    target: String,
    archive_path: PathBuf,
    files: usize,
    paths: Vec<String>,
}

/// Execute the `appforge generate` command.
///
/// Dispatch sequence:
/// 1. Load and validate the descriptor (with `--target` applied)
/// 2. Resolve output directory and generation options
/// 3. Early-exit with a listing if `--dry-run`
/// 4. Confirm with user unless `--yes`, `--quiet` or non-interactive
/// 5. Generate and package via `GenerationService`
/// 6. Print the report
#[instrument(skip_all, fields(descriptor = %args.descriptor.display()))]
pub fn execute(
    args: GenerateArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Descriptor
    let descriptor = load_descriptor(&args.descriptor, args.target.as_deref())?;
    debug!(
        project = %descriptor.name(),
        target = %descriptor.target(),
        tables = descriptor.tables().len(),
        endpoints = descriptor.endpoints().len(),
        "Descriptor loaded"
    );

    // 2. Options
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.generation.output_dir.clone());
    let options = resolve_options(&args, &config);
    let registry = Box::new(HandlebarsRegistry::from_environment()?);

    // 3. Dry run: in memory only.
    if args.dry_run {
        let service = GenerationService::new(
            registry,
            Box::new(MemoryFilesystem::new()),
            Box::new(ZipPackager::new()),
            options,
        );
        return show_preview(&service, &descriptor, &output_dir, &output);
    }

    // 4. Confirm
    if !output.is_quiet() && !args.yes && output.format() != OutputFormat::Json {
        show_configuration(&descriptor, &output_dir, &output)?;
        if std::io::stdin().is_terminal() && !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Generate
    let service = GenerationService::new(
        registry,
        Box::new(LocalFilesystem::new()),
        Box::new(ZipPackager::new()),
        options,
    );
    let spinner = output.spinner(&format!(
        "Generating {} project '{}'...",
        descriptor.target().display_name(),
        descriptor.name()
    ));
    info!(output = %output_dir.display(), "Generation started");
    let result = service.generate(&descriptor, &output_dir);
    spinner.finish_and_clear();
    let report = result?;

    // 6. Report
    if output.format() == OutputFormat::Json {
        output.json(&JsonReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            report: &report,
        })?;
        return Ok(());
    }

    output.success(&format!(
        "Generated {} ({} files, {} directories)",
        report.archive.archive_path.display(),
        report.files,
        report.directories
    ))?;
    if !output.is_quiet() {
        output.print(&format!(
            "  {} bytes archived in {} ms",
            report.archive.size_bytes, report.elapsed_ms
        ))?;
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  unzip {}", report.archive.archive_path.display()))?;
    }

    Ok(())
}

/// Read the descriptor, apply a target override, and validate it.
pub fn load_descriptor(path: &Path, target: Option<&str>) -> CliResult<ProjectDescriptor> {
    if !path.is_file() {
        return Err(CliError::DescriptorNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut document: DescriptorDocument = descriptor_loader::load_document(path)?;
    if let Some(target) = target {
        document.target = target.to_string();
    }
    Ok(ProjectDescriptor::from_document(document).map_err(ForgeError::from)?)
}

fn resolve_options(args: &GenerateArgs, config: &AppConfig) -> GenerationOptions {
    let mut options = config.generation_options();
    options.overwrite = args.force;
    if args.seed.is_some() {
        options.seed = args.seed;
    }
    options
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_preview(
    service: &GenerationService,
    descriptor: &ProjectDescriptor,
    output_dir: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    let preview = service.preview(descriptor)?;
    let archive_path = ZipPackager::new().archive_path(descriptor.name(), output_dir);

    if out.format() == OutputFormat::Json {
        out.json(&JsonPreview {
            generated_at: chrono::Utc::now().to_rfc3339(),
            dry_run: true,
            project: descriptor.name(),
            target: descriptor.target().to_string(),
            archive_path,
            files: preview.files.len(),
            paths: preview.paths(),
        })?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would write {} ({} files)",
        archive_path.display(),
        preview.files.len()
    ))?;
    for path in preview.paths() {
        out.print(&format!("  {path}"))?;
    }
    Ok(())
}

fn show_configuration(
    descriptor: &ProjectDescriptor,
    output_dir: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:    {}", descriptor.name()))?;
    out.print(&format!("  Target:     {}", descriptor.target().display_name()))?;
    out.print(&format!("  Identifier: {}", descriptor.platform_identifier_or_default()))?;
    out.print(&format!("  Tables:     {}", descriptor.tables().len()))?;
    out.print(&format!("  Endpoints:  {}", descriptor.endpoints().len()))?;
    out.print(&format!("  Screens:    {}", descriptor.components().len()))?;
    out.print(&format!("  Location:   {}", output_dir.display()))?;
    out.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::Prompt {
            source: Box::new(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_core::domain::Target;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn args(descriptor: PathBuf) -> GenerateArgs {
        GenerateArgs {
            descriptor,
            output: None,
            target: None,
            seed: None,
            yes: true,
            force: false,
            dry_run: false,
        }
    }

    #[test]
    fn missing_descriptor_is_not_found() {
        let err = load_descriptor(Path::new("/no/such/app.json"), None).unwrap_err();
        assert!(matches!(err, CliError::DescriptorNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn target_override_replaces_descriptor_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "app.json", r#"{ "name": "Acme", "target": "ios" }"#);
        let descriptor = load_descriptor(&path, Some("flutter")).unwrap();
        assert_eq!(descriptor.target(), Target::Flutter);
    }

    #[test]
    fn unknown_target_is_a_user_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "app.json", r#"{ "name": "Acme", "target": "ios" }"#);
        let err = load_descriptor(&path, Some("symbian")).unwrap_err();
        assert!(matches!(err, CliError::Core(ForgeError::Domain(_))));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn cli_flags_override_config() {
        let mut config = AppConfig::default();
        config.generation.seed = Some(1);
        let mut a = args(PathBuf::from("x.json"));
        a.force = true;
        a.seed = Some(9);
        let options = resolve_options(&a, &config);
        assert!(options.overwrite);
        assert_eq!(options.seed, Some(9));

        let options = resolve_options(&args(PathBuf::from("x.json")), &config);
        assert_eq!(options.seed, Some(1));
        assert!(!options.overwrite);
    }
}
