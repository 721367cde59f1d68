//! Catalog Service - read-only queries about targets and templates.
//!
//! Separated from GenerationService for single responsibility.

use serde::Serialize;

use crate::{
    application::{generators, ports::TemplateRegistry},
    domain::Target,
};

/// Summary of one supported target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub family: String,
    pub language: &'static str,
    pub file_extension: &'static str,
    pub steps: Vec<&'static str>,
}

impl TargetInfo {
    pub fn of(target: Target) -> Self {
        let language = target.language();
        Self {
            id: target.as_str(),
            display_name: target.display_name(),
            family: target.family().to_string(),
            language: language.as_str(),
            file_extension: language.file_extension(),
            steps: generators::for_target(target)
                .steps()
                .iter()
                .map(|s| s.name)
                .collect(),
        }
    }
}

/// Service for catalog queries.
pub struct CatalogService {
    registry: Box<dyn TemplateRegistry>,
}

impl CatalogService {
    pub fn new(registry: Box<dyn TemplateRegistry>) -> Self {
        Self { registry }
    }

    /// Every supported target, in declaration order.
    pub fn targets(&self) -> Vec<TargetInfo> {
        Target::ALL.into_iter().map(TargetInfo::of).collect()
    }

    /// Registered templates a target can draw on, sorted.
    pub fn templates_for(&self, target: Target) -> Vec<String> {
        let prefixes = template_prefixes(target);
        self.registry
            .template_names()
            .into_iter()
            .filter(|name| {
                name.split_once('/')
                    .is_some_and(|(dir, _)| prefixes.contains(&dir))
            })
            .collect()
    }

    pub fn all_templates(&self) -> Vec<String> {
        self.registry.template_names()
    }
}

/// Template directories used by a target's generator.
fn template_prefixes(target: Target) -> &'static [&'static str] {
    match target {
        Target::Android => &["android", "common"],
        Target::Ios => &["ios", "common"],
        Target::ReactNative => &["react-native", "typescript", "common"],
        Target::Flutter => &["flutter", "common"],
        Target::BackendExpress => &["express", "typescript", "common"],
        Target::BackendFastapi => &["fastapi", "common"],
    }
}
