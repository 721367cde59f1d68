//! Generation Service - main application orchestrator.
//!
//! Coordinates one generation run end to end:
//! 1. Generate the file set in memory (validation and template errors
//!    surface here, before any filesystem mutation)
//! 2. Create a fresh, uniquely named scratch directory
//! 3. Ensure the directory skeleton, then flush files
//! 4. Hand the scratch directory to the packager
//! 5. Remove the scratch directory, on success and on every error path

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        generators::{self, GenerationContext, PlatformGenerator},
        ports::{Filesystem, PackageReceipt, Packager, TemplateRegistry},
        services::DirectoryTreeBuilder,
    },
    domain::{DescriptorDocument, FileSet, IdentifierGraph, ProjectDescriptor, RelativePath},
    error::ForgeResult,
};

/// Tunables for a [`GenerationService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Parent directory for per-run scratch directories.
    pub scratch_base: PathBuf,
    /// Run independent generator steps on scoped threads.
    pub parallel_steps: bool,
    /// Fixed identifier seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Replace an existing archive at the destination.
    pub overwrite: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            scratch_base: std::env::temp_dir().join("appforge"),
            parallel_steps: false,
            seed: None,
            overwrite: false,
        }
    }
}

/// Outcome of a packaged run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub project: String,
    pub target: String,
    pub files: usize,
    pub directories: usize,
    pub content_bytes: usize,
    pub paths: Vec<String>,
    pub archive: PackageReceipt,
    pub elapsed_ms: u128,
}

/// Outcome of an in-memory run.
#[derive(Debug, Clone)]
pub struct Preview {
    pub files: FileSet,
    pub directories: Vec<RelativePath>,
}

impl Preview {
    /// Every path the run would create, directories first, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut dirs: Vec<String> = self
            .directories
            .iter()
            .chain(self.files.directories().iter())
            .map(|d| format!("{d}/"))
            .collect();
        dirs.sort();
        dirs.dedup();
        let mut files: Vec<String> = self.files.path_set().into_iter().collect();
        dirs.append(&mut files);
        dirs
    }
}

/// Main generation service.
pub struct GenerationService {
    registry: Box<dyn TemplateRegistry>,
    filesystem: Box<dyn Filesystem>,
    packager: Box<dyn Packager>,
    options: GenerationOptions,
}

impl GenerationService {
    pub fn new(
        registry: Box<dyn TemplateRegistry>,
        filesystem: Box<dyn Filesystem>,
        packager: Box<dyn Packager>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            registry,
            filesystem,
            packager,
            options,
        }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Validate a raw document, then [`generate`](Self::generate).
    pub fn generate_document(
        &self,
        document: DescriptorDocument,
        output_dir: impl AsRef<Path>,
    ) -> ForgeResult<GenerationReport> {
        let descriptor = ProjectDescriptor::from_document(document)?;
        self.generate(&descriptor, output_dir)
    }

    /// Generate, materialise and package a project.
    #[instrument(
        skip_all,
        fields(
            project = %descriptor.name(),
            target = %descriptor.target(),
            output = %output_dir.as_ref().display()
        )
    )]
    pub fn generate(
        &self,
        descriptor: &ProjectDescriptor,
        output_dir: impl AsRef<Path>,
    ) -> ForgeResult<GenerationReport> {
        let started = Instant::now();
        let output_dir = output_dir.as_ref();
        info!("Generating {} project", descriptor.target().display_name());

        let archive_path = self.packager.archive_path(descriptor.name(), output_dir);
        if !self.options.overwrite && self.filesystem.exists(&archive_path) {
            return Err(ApplicationError::ArchiveExists { path: archive_path }.into());
        }

        let scratch = self
            .options
            .scratch_base
            .join(format!("{}-{}", descriptor.slug(), Uuid::new_v4()));
        let generator = generators::for_target(descriptor.target());

        // 1. In memory: nothing touches the filesystem until this succeeds.
        let ctx = self.context(descriptor, &scratch, generator.as_ref());
        let files = generator.generate(&ctx)?;
        info!(files = files.len(), "File set generated");

        // 2. Scratch directory: always fresh.
        if self.filesystem.exists(&scratch) {
            return Err(ApplicationError::ScratchExists { path: scratch }.into());
        }
        self.filesystem.create_dir_all(&scratch)?;

        // 3-4. Flush and package, then always clean up.
        let outcome = self
            .materialize(&ctx, generator.as_ref(), &files, &scratch)
            .and_then(|directories| {
                let receipt = self
                    .packager
                    .package(&scratch, descriptor.name(), output_dir)?;
                Ok((directories, receipt))
            });
        self.cleanup(&scratch);
        let (directories, archive) = outcome?;

        info!(
            archive = %archive.archive_path.display(),
            bytes = archive.size_bytes,
            "Generation completed successfully"
        );

        Ok(GenerationReport {
            project: descriptor.name().to_string(),
            target: descriptor.target().to_string(),
            files: files.len(),
            directories,
            content_bytes: files.total_bytes(),
            paths: files.path_set().into_iter().collect(),
            archive,
            elapsed_ms: started.elapsed().as_millis(),
        })
    }

    /// Generate in memory only.
    #[instrument(skip_all, fields(project = %descriptor.name(), target = %descriptor.target()))]
    pub fn preview(&self, descriptor: &ProjectDescriptor) -> ForgeResult<Preview> {
        let generator = generators::for_target(descriptor.target());
        let scratch = self.options.scratch_base.join("preview");
        let ctx = self.context(descriptor, &scratch, generator.as_ref());
        let files = generator.generate(&ctx)?;
        let directories = DirectoryTreeBuilder::new(self.filesystem.as_ref(), self.registry.as_ref())
            .resolve(generator.skeleton(), &ctx.template_data(json!({}))?)?;
        debug!(files = files.len(), "preview generated");
        Ok(Preview { files, directories })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn context<'a>(
        &'a self,
        descriptor: &'a ProjectDescriptor,
        scratch: &Path,
        generator: &dyn PlatformGenerator,
    ) -> GenerationContext<'a> {
        let mut ctx = GenerationContext::new(descriptor, self.registry.as_ref(), scratch)
            .with_parallel_steps(self.options.parallel_steps);
        if generator.needs_identifier_graph() {
            let graph = match self.options.seed {
                Some(seed) => IdentifierGraph::seeded(seed),
                None => IdentifierGraph::from_entropy(),
            };
            ctx = ctx.with_identifiers(graph);
        }
        ctx
    }

    /// Skeleton, parent directories, then files. Returns the directory count.
    fn materialize(
        &self,
        ctx: &GenerationContext<'_>,
        generator: &dyn PlatformGenerator,
        files: &FileSet,
        scratch: &Path,
    ) -> ForgeResult<usize> {
        let skeleton = DirectoryTreeBuilder::new(self.filesystem.as_ref(), self.registry.as_ref())
            .ensure(generator.skeleton(), scratch, &ctx.template_data(json!({}))?)?;

        let parents = files.directories();
        for dir in &parents {
            self.filesystem.create_dir_all(&scratch.join(dir))?;
        }

        for file in files.files() {
            self.filesystem
                .write_file(&scratch.join(file.path()), file.content())?;
        }

        let mut all: Vec<&RelativePath> = skeleton.iter().chain(parents.iter()).collect();
        all.sort();
        all.dedup();
        debug!(directories = all.len(), files = files.len(), "scratch tree written");
        Ok(all.len())
    }

    /// Best-effort removal of the scratch directory.
    fn cleanup(&self, scratch: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(scratch) {
            warn!(
                error = %e,
                path = %scratch.display(),
                "Scratch cleanup failed"
            );
        } else {
            debug!(path = %scratch.display(), "Scratch directory removed");
        }
    }
}
