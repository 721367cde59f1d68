//! Android: Gradle Kotlin DSL project with Jetpack Compose.

use serde_json::json;

use super::{GenerationContext, PlatformGenerator, Requirement, Step};
use crate::{
    domain::{DomainValidator, FileSet, Target},
    error::ForgeResult,
};

const GITIGNORE: &str = "\
*.iml
.gradle
/local.properties
/.idea
.DS_Store
/build
/captures
.externalNativeBuild
.cxx
local.properties
";

const PROGUARD_RULES: &str = "\
# Project specific ProGuard rules.
-keepattributes Signature
-keepattributes *Annotation*
";

pub struct AndroidGenerator;

impl PlatformGenerator for AndroidGenerator {
    fn target(&self) -> Target {
        Target::Android
    }

    fn skeleton(&self) -> &'static [&'static str] {
        &[
            "app/src/main/java/{{project.identifierPath}}/data/model",
            "app/src/main/java/{{project.identifierPath}}/data/remote",
            "app/src/main/java/{{project.identifierPath}}/ui/screens",
            "app/src/main/java/{{project.identifierPath}}/ui/theme",
            "app/src/main/res/values",
            "app/src/main/res/drawable",
            "gradle/wrapper",
        ]
    }

    fn steps(&self) -> Vec<Step> {
        vec![
            Step::new("build-config", Requirement::Always, build_config),
            Step::new("manifest", Requirement::Always, manifest),
            Step::new("entry-point", Requirement::Always, entry_point),
            Step::new("resources", Requirement::Always, resources),
            Step::new("data-models", Requirement::Schema, data_models),
            Step::new("api-client", Requirement::Endpoints, api_client),
            Step::new("screens", Requirement::Components, screens),
            Step::new("project-files", Requirement::Always, project_files),
        ]
    }

    /// The package name shapes every source path, so it is checked up front.
    fn prepare(&self, ctx: &GenerationContext<'_>) -> ForgeResult<()> {
        DomainValidator::validate_package_name(&ctx.project().identifier)?;
        Ok(())
    }
}

fn source_dir(ctx: &GenerationContext<'_>) -> String {
    format!("app/src/main/java/{}", ctx.project().identifier_path)
}

fn build_config(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.render_project("android/settings.gradle.kts", "settings.gradle.kts")?)
        .with(ctx.render_project("android/build.gradle.kts", "build.gradle.kts")?)
        .with(ctx.render_project("android/app.build.gradle.kts", "app/build.gradle.kts")?)
        .with(ctx.render_project("android/gradle.properties", "gradle.properties")?)
        .with(ctx.render_project(
            "android/gradle-wrapper.properties",
            "gradle/wrapper/gradle-wrapper.properties",
        )?)
        .with(ctx.verbatim("app/proguard-rules.pro", PROGUARD_RULES)?))
}

fn manifest(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new().with(ctx.render_project(
        "android/AndroidManifest.xml",
        "app/src/main/AndroidManifest.xml",
    )?))
}

fn entry_point(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let dir = source_dir(ctx);
    Ok(FileSet::new()
        .with(ctx.render_project("android/MainActivity.kt", format!("{dir}/MainActivity.kt"))?)
        .with(ctx.render_project("android/Theme.kt", format!("{dir}/ui/theme/Theme.kt"))?))
}

fn resources(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for name in ["strings", "colors", "themes"] {
        files.push(ctx.render_project(
            &format!("android/{name}.xml"),
            format!("app/src/main/res/values/{name}.xml"),
        )?);
    }
    Ok(files)
}

fn data_models(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let dir = source_dir(ctx);
    let mut files = FileSet::new();
    for model in &ctx.project().models {
        files.push(ctx.render(
            "android/Model.kt",
            format!("{dir}/data/model/{}.kt", model.name),
            json!({ "model": model }),
        )?);
    }
    Ok(files)
}

fn api_client(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let dir = source_dir(ctx);
    Ok(FileSet::new()
        .with(ctx.render_project("android/ApiService.kt", format!("{dir}/data/remote/ApiService.kt"))?)
        .with(ctx.render_project("android/ApiClient.kt", format!("{dir}/data/remote/ApiClient.kt"))?))
}

fn screens(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let dir = source_dir(ctx);
    let mut files = FileSet::new();
    for component in &ctx.project().components {
        files.push(ctx.render(
            "android/Screen.kt",
            format!("{dir}/ui/screens/{}Screen.kt", component.name),
            json!({ "component": component }),
        )?);
    }
    Ok(files)
}

fn project_files(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.verbatim(".gitignore", GITIGNORE)?)
        .with(ctx.render("common/README.md", "README.md", readme_extra())?))
}

fn readme_extra() -> serde_json::Value {
    json!({
        "platform": "Android",
        "run": ["./gradlew assembleDebug", "./gradlew installDebug"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::generators::tests::echo_registry;
    use crate::domain::{DescriptorDocument, DomainError, ProjectDescriptor};
    use crate::error::ForgeError;

    fn descriptor(value: serde_json::Value) -> ProjectDescriptor {
        let doc: DescriptorDocument = serde_json::from_value(value).unwrap();
        ProjectDescriptor::from_document(doc).unwrap()
    }

    #[test]
    fn models_land_under_the_package_path() {
        let registry = echo_registry();
        let d = descriptor(serde_json::json!({
            "name": "Acme",
            "platformIdentifier": "com.acme.shop",
            "target": "android",
            "databaseSchema": { "tables": [
                { "name": "order_item" }, { "name": "customer" }
            ]}
        }));
        let files = AndroidGenerator
            .generate(&GenerationContext::new(&d, &registry, "/tmp/unused"))
            .unwrap();
        let paths = files.path_set();
        assert!(paths.contains("app/src/main/java/com/acme/shop/data/model/OrderItem.kt"));
        assert!(paths.contains("app/src/main/java/com/acme/shop/data/model/Customer.kt"));
        assert!(paths.contains("app/src/main/java/com/acme/shop/MainActivity.kt"));
        assert!(!paths.iter().any(|p| p.contains("data/remote")));
    }

    #[test]
    fn rejects_malformed_package_name() {
        let registry = echo_registry();
        let d = descriptor(serde_json::json!({
            "name": "Acme",
            "platformIdentifier": "Acme",
            "target": "android"
        }));
        let err = AndroidGenerator
            .generate(&GenerationContext::new(&d, &registry, "/tmp/unused"))
            .unwrap_err();
        assert!(matches!(err, ForgeError::Domain(DomainError::Validation { .. })));
    }

    #[test]
    fn keyword_in_default_package_is_rejected() {
        let registry = echo_registry();
        let d = descriptor(serde_json::json!({ "name": "New", "target": "android" }));
        assert_eq!(d.platform_identifier_or_default(), "com.example.new");
        let err = AndroidGenerator
            .generate(&GenerationContext::new(&d, &registry, "/tmp/unused"))
            .unwrap_err();
        match err {
            ForgeError::Domain(DomainError::Validation { field, reason }) => {
                assert_eq!(field, "platformIdentifier");
                assert!(reason.contains("'new'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
