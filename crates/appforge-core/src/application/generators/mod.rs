//! Platform generators.
//!
//! Each target is a [`PlatformGenerator`]: a directory skeleton plus a fixed,
//! ordered list of [`Step`]s. Steps only read the shared
//! [`GenerationContext`] and return their own partial [`FileSet`]; the
//! pipeline merges partials in step order, so running steps on scoped
//! threads changes nothing about the output.
//!
//! ```text
//! prepare ──► step 1 ─┐
//!             step 2 ─┼─► merge (step order) ──► finalize ──► validate
//!             step n ─┘
//! ```

pub mod android;
pub mod backend;
pub mod context;
pub mod cross_platform;
pub mod ios;
mod xcode;

use std::path::{Path, PathBuf};
use std::thread;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::TemplateRegistry},
    domain::{
        DomainValidator, FileSet, GeneratedFile, IdentifierGraph, ProjectDescriptor,
        RelativePath, Target,
    },
    error::{ForgeError, ForgeResult},
};

pub use context::ProjectContext;

/// Which descriptor section a step needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Structurally mandatory; always runs.
    Always,
    Schema,
    Endpoints,
    Components,
}

impl Requirement {
    pub fn satisfied_by(&self, descriptor: &ProjectDescriptor) -> bool {
        match self {
            Self::Always => true,
            Self::Schema => descriptor.has_schema(),
            Self::Endpoints => descriptor.has_endpoints(),
            Self::Components => descriptor.has_components(),
        }
    }
}

pub type StepFn = fn(&GenerationContext<'_>) -> ForgeResult<FileSet>;

/// One unit of a generator pipeline.
#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub requires: Requirement,
    pub run: StepFn,
}

impl Step {
    pub const fn new(name: &'static str, requires: Requirement, run: StepFn) -> Self {
        Self {
            name,
            requires,
            run,
        }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish()
    }
}

/// Per-run state shared read-only by every step.
pub struct GenerationContext<'a> {
    descriptor: &'a ProjectDescriptor,
    registry: &'a dyn TemplateRegistry,
    scratch_root: PathBuf,
    identifiers: Option<IdentifierGraph>,
    project: ProjectContext,
    parallel: bool,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        descriptor: &'a ProjectDescriptor,
        registry: &'a dyn TemplateRegistry,
        scratch_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            descriptor,
            registry,
            scratch_root: scratch_root.into(),
            identifiers: None,
            project: ProjectContext::build(descriptor),
            parallel: false,
        }
    }

    /// Attach an identifier graph (required by reference-graph targets).
    pub fn with_identifiers(mut self, graph: IdentifierGraph) -> Self {
        self.identifiers = Some(graph);
        self
    }

    pub fn with_parallel_steps(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn descriptor(&self) -> &ProjectDescriptor {
        self.descriptor
    }

    pub fn registry(&self) -> &dyn TemplateRegistry {
        self.registry
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    pub fn project(&self) -> &ProjectContext {
        &self.project
    }

    pub fn identifiers(&self) -> ForgeResult<&IdentifierGraph> {
        self.identifiers.as_ref().ok_or_else(|| ForgeError::Internal {
            message: "generator requires an identifier graph but none was attached".into(),
        })
    }

    pub fn take_identifiers(&mut self) -> Option<IdentifierGraph> {
        self.identifiers.take()
    }

    /// JSON view of `{ project }`, merged with `extra`'s top-level keys.
    pub fn template_data(&self, extra: impl Serialize) -> ForgeResult<serde_json::Value> {
        let mut data = json!({ "project": &self.project });
        let extra = serde_json::to_value(extra).map_err(|e| ForgeError::Internal {
            message: format!("template context did not serialize: {e}"),
        })?;
        if let (Some(target), serde_json::Value::Object(extra)) = (data.as_object_mut(), extra) {
            target.extend(extra);
        }
        Ok(data)
    }

    /// Compile `template` with `{ project, ..extra }` into a file at `path`.
    pub fn render(
        &self,
        template: &str,
        path: impl AsRef<str>,
        extra: impl Serialize,
    ) -> ForgeResult<GeneratedFile> {
        let data = self.template_data(extra)?;
        let content = self.registry.compile(template, &data)?;
        let path = RelativePath::try_new(path.as_ref())?;
        Ok(GeneratedFile::templated(path, template, content))
    }

    /// Compile `template` with only `{ project }`.
    pub fn render_project(&self, template: &str, path: impl AsRef<str>) -> ForgeResult<GeneratedFile> {
        self.render(template, path, json!({}))
    }

    pub fn verbatim(&self, path: impl AsRef<str>, content: &str) -> ForgeResult<GeneratedFile> {
        Ok(GeneratedFile::verbatim(
            RelativePath::try_new(path.as_ref())?,
            content,
        ))
    }
}

/// A target's generator.
pub trait PlatformGenerator: Send + Sync {
    fn target(&self) -> Target;

    /// Directories that always exist in the output, relative to the root.
    /// Entries may contain `{{…}}` placeholders rendered against
    /// `{ project }`.
    fn skeleton(&self) -> &'static [&'static str];

    fn steps(&self) -> Vec<Step>;

    /// Whether [`GenerationContext::identifiers`] must be attached.
    fn needs_identifier_graph(&self) -> bool {
        false
    }

    /// Runs once before any step.
    fn prepare(&self, _ctx: &GenerationContext<'_>) -> ForgeResult<()> {
        Ok(())
    }

    /// Runs once after every step, with the merged output so far.
    fn finalize(&self, _ctx: &GenerationContext<'_>, _files: &FileSet) -> ForgeResult<FileSet> {
        Ok(FileSet::new())
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
        run_pipeline(self, ctx)
    }
}

/// Look up the generator for a target.
pub fn for_target(target: Target) -> Box<dyn PlatformGenerator> {
    match target {
        Target::Android => Box::new(android::AndroidGenerator),
        Target::Ios => Box::new(ios::IosGenerator),
        Target::ReactNative => Box::new(cross_platform::ReactNativeGenerator),
        Target::Flutter => Box::new(cross_platform::FlutterGenerator),
        Target::BackendExpress => Box::new(backend::ExpressGenerator),
        Target::BackendFastapi => Box::new(backend::FastApiGenerator),
    }
}

/// Execute a generator's steps and merge their output.
#[instrument(skip_all, fields(target = %generator.target(), parallel = ctx.parallel))]
pub fn run_pipeline<G>(generator: &G, ctx: &GenerationContext<'_>) -> ForgeResult<FileSet>
where
    G: PlatformGenerator + ?Sized,
{
    generator.prepare(ctx)?;

    let steps: Vec<Step> = generator
        .steps()
        .into_iter()
        .filter(|step| {
            let run = step.requires.satisfied_by(ctx.descriptor());
            if !run {
                debug!(step = step.name, requires = ?step.requires, "skipping step");
            }
            run
        })
        .collect();

    let partials = if ctx.parallel && steps.len() > 1 {
        run_parallel(&steps, ctx)?
    } else {
        steps
            .iter()
            .map(|step| run_step(step, ctx))
            .collect::<ForgeResult<Vec<_>>>()?
    };

    let mut files = FileSet::new();
    for partial in partials {
        files.extend(partial);
    }

    let tail = generator.finalize(ctx, &files)?;
    files.extend(tail);

    DomainValidator::validate_file_set(&files)?;
    debug!(files = files.len(), "pipeline complete");
    Ok(files)
}

fn run_step(step: &Step, ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    debug!(step = step.name, "running step");
    let files = (step.run)(ctx)?;
    debug!(step = step.name, files = files.len(), "step done");
    Ok(files)
}

/// Run every step on its own scoped thread; results come back in step order.
fn run_parallel(steps: &[Step], ctx: &GenerationContext<'_>) -> ForgeResult<Vec<FileSet>> {
    thread::scope(|scope| {
        let handles: Vec<_> = steps
            .iter()
            .map(|step| (step.name, scope.spawn(move || run_step(step, ctx))))
            .collect();

        handles
            .into_iter()
            .map(|(name, handle)| {
                handle.join().map_err(|_| {
                    ForgeError::from(ApplicationError::StepPanicked {
                        step: name.to_string(),
                    })
                })?
            })
            .collect()
    })
}
