//! Handlebars-backed template registry.
//!
//! Strict mode is on, so a template that names a missing context field fails
//! instead of rendering an empty string. HTML escaping is off; every output
//! is source code.

use std::path::Path;

use appforge_core::{
    application::{ApplicationError, ports::TemplateRegistry},
    domain::case,
    error::ForgeResult,
};
use handlebars::{Handlebars, handlebars_helper};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{builtin_templates, template_loader::FilesystemTemplateLoader};

/// Registered helper names. A bare `{{snake}}` resolves to the helper, not to
/// a context field of the same name; templates write `{{this.snake}}`.
const CASE_HELPERS: [&str; 6] = ["camel", "pascal", "snake", "kebab", "upper", "lower"];

handlebars_helper!(camel: |s: str| case::camel(s));
handlebars_helper!(pascal: |s: str| case::pascal(s));
handlebars_helper!(snake: |s: str| case::snake(s));
handlebars_helper!(kebab: |s: str| case::kebab(s));
handlebars_helper!(upper: |s: str| case::upper(s));
handlebars_helper!(lower: |s: str| case::lower(s));

/// Named templates compiled into a single Handlebars instance.
pub struct HandlebarsRegistry {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRegistry {
    /// Empty registry with the case helpers installed.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        let [c, p, s, k, u, l] = CASE_HELPERS;
        handlebars.register_helper(c, Box::new(camel));
        handlebars.register_helper(p, Box::new(pascal));
        handlebars.register_helper(s, Box::new(snake));
        handlebars.register_helper(k, Box::new(kebab));
        handlebars.register_helper(u, Box::new(upper));
        handlebars.register_helper(l, Box::new(lower));
        Self { handlebars }
    }

    /// Registry holding every built-in template.
    pub fn with_builtin() -> ForgeResult<Self> {
        let mut registry = Self::new();
        for (name, source) in builtin_templates::BUILTIN_TEMPLATES {
            registry.register(name, source)?;
        }
        debug!(count = registry.len(), "built-in templates registered");
        Ok(registry)
    }

    /// Built-in templates, then any found under `$APPFORGE_TEMPLATES_DIR`.
    #[instrument(skip_all)]
    pub fn from_environment() -> ForgeResult<Self> {
        let mut registry = Self::with_builtin()?;
        if let Some(dir) = builtin_templates::override_dir() {
            let replaced = registry.register_dir(&dir)?;
            info!(path = %dir.display(), replaced, "template overrides loaded");
        }
        Ok(registry)
    }

    /// Compile and store `source` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, source: &str) -> ForgeResult<()> {
        self.handlebars
            .register_template_string(name, source)
            .map_err(|e| template_error(name, e))
    }

    /// Register every `.hbs` file under `dir`. Returns how many were loaded.
    pub fn register_dir(&mut self, dir: &Path) -> ForgeResult<usize> {
        let templates = FilesystemTemplateLoader::new(dir).load_all()?;
        for (name, source) in &templates {
            self.register(name, source)?;
        }
        Ok(templates.len())
    }

    pub fn len(&self) -> usize {
        self.handlebars.get_templates().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HandlebarsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry for HandlebarsRegistry {
    fn compile(&self, name: &str, context: &Value) -> ForgeResult<String> {
        if !self.handlebars.has_template(name) {
            return Err(template_error(name, "template is not registered"));
        }
        self.handlebars
            .render(name, context)
            .map_err(|e| template_error(name, e))
    }

    fn compile_str(&self, source: &str, context: &Value) -> ForgeResult<String> {
        self.handlebars
            .render_template(source, context)
            .map_err(|e| template_error(source, e))
    }

    fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlebars.get_templates().keys().cloned().collect();
        names.sort();
        names
    }
}

fn template_error(template: &str, reason: impl std::fmt::Display) -> appforge_core::error::ForgeError {
    ApplicationError::template(template, reason.to_string()).into()
}
