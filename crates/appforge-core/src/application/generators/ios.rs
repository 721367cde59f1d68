//! iOS: SwiftUI app plus a hand-built Xcode project file.
//!
//! The project file is a reference graph. The fixed roles are allocated in
//! `prepare`; each step registers roles for the files it emits as it emits
//! them; `finalize` renders `project.pbxproj` from the table and verifies
//! that every identifier in the rendered text came from it.

use serde_json::json;
use tracing::debug;

use super::{GenerationContext, PlatformGenerator, Requirement, Step, xcode};
use crate::{
    domain::{DomainValidator, FileSet, Target},
    error::ForgeResult,
};

const GITIGNORE: &str = "\
.DS_Store
xcuserdata/
*.xcuserstate
DerivedData/
build/
*.ipa
*.dSYM.zip
";

const ASSET_CATALOG: &str = r#"{
  "info" : {
    "author" : "xcode",
    "version" : 1
  }
}
"#;

const APP_ICON: &str = r#"{
  "images" : [
    {
      "idiom" : "universal",
      "platform" : "ios",
      "size" : "1024x1024"
    }
  ],
  "info" : {
    "author" : "xcode",
    "version" : 1
  }
}
"#;

const ACCENT_COLOR: &str = r#"{
  "colors" : [
    {
      "idiom" : "universal"
    }
  ],
  "info" : {
    "author" : "xcode",
    "version" : 1
  }
}
"#;

pub struct IosGenerator;

impl PlatformGenerator for IosGenerator {
    fn target(&self) -> Target {
        Target::Ios
    }

    fn skeleton(&self) -> &'static [&'static str] {
        &[
            "{{project.pascal}}/Models",
            "{{project.pascal}}/Views",
            "{{project.pascal}}/Services",
            "{{project.pascal}}/Core Data",
            "{{project.pascal}}/Resources",
            "{{project.pascal}}.xcodeproj",
        ]
    }

    fn steps(&self) -> Vec<Step> {
        vec![
            Step::new("info-plist", Requirement::Always, info_plist),
            Step::new("entry-point", Requirement::Always, entry_point),
            Step::new("data-models", Requirement::Schema, data_models),
            Step::new("core-data", Requirement::Schema, core_data),
            Step::new("api-client", Requirement::Endpoints, api_client),
            Step::new("views", Requirement::Components, views),
            Step::new("resources", Requirement::Always, resources),
            Step::new("project-files", Requirement::Always, project_files),
        ]
    }

    fn needs_identifier_graph(&self) -> bool {
        true
    }

    fn prepare(&self, ctx: &GenerationContext<'_>) -> ForgeResult<()> {
        DomainValidator::validate_bundle_identifier(&ctx.project().identifier)?;
        ctx.identifiers()?.allocate(&xcode::FIXED_ROLES)?;
        Ok(())
    }

    fn finalize(&self, ctx: &GenerationContext<'_>, files: &FileSet) -> ForgeResult<FileSet> {
        let product = &ctx.project().pascal;
        let table = ctx.identifiers()?.snapshot()?;
        let data = xcode::pbxproj_context(&table, product, &ctx.project().identifier, files)?;
        let file = ctx.render(
            "ios/project.pbxproj",
            format!("{product}.xcodeproj/project.pbxproj"),
            json!({ "pbx": data }),
        )?;
        table.verify(file.content())?;
        debug!(roles = table.len(), "project file references verified");
        Ok(FileSet::new().with(file))
    }
}

/// Register project roles for a step's output before handing it back.
fn emit(ctx: &GenerationContext<'_>, files: FileSet) -> ForgeResult<FileSet> {
    xcode::register_items(ctx.identifiers()?, &ctx.project().pascal, &files)?;
    Ok(files)
}

fn app_path(ctx: &GenerationContext<'_>, rest: &str) -> String {
    format!("{}/{rest}", ctx.project().pascal)
}

fn info_plist(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let files =
        FileSet::new().with(ctx.render_project("ios/Info.plist", app_path(ctx, "Info.plist"))?);
    emit(ctx, files)
}

fn entry_point(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let app_file = format!("{}App.swift", ctx.project().pascal);
    let files = FileSet::new()
        .with(ctx.render_project("ios/App.swift", app_path(ctx, &app_file))?)
        .with(ctx.render_project("ios/ContentView.swift", app_path(ctx, "Views/ContentView.swift"))?);
    emit(ctx, files)
}

fn data_models(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for model in &ctx.project().models {
        files.push(ctx.render(
            "ios/Model.swift",
            app_path(ctx, &format!("Models/{}.swift", model.name)),
            json!({ "model": model }),
        )?);
    }
    emit(ctx, files)
}

fn core_data(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let product = &ctx.project().pascal;
    let files = FileSet::new()
        .with(ctx.render_project(
            "ios/xcdatamodel.contents",
            app_path(
                ctx,
                &format!("Core Data/{product}.xcdatamodeld/{product}.xcdatamodel/contents"),
            ),
        )?)
        .with(ctx.render_project(
            "ios/PersistenceController.swift",
            app_path(ctx, "Core Data/PersistenceController.swift"),
        )?);
    emit(ctx, files)
}

fn api_client(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let files = FileSet::new().with(
        ctx.render_project("ios/APIClient.swift", app_path(ctx, "Services/APIClient.swift"))?,
    );
    emit(ctx, files)
}

fn views(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for component in &ctx.project().components {
        files.push(ctx.render(
            "ios/View.swift",
            app_path(ctx, &format!("Views/{}View.swift", component.name)),
            json!({ "component": component }),
        )?);
    }
    emit(ctx, files)
}

fn resources(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let catalog = app_path(ctx, "Resources/Assets.xcassets");
    let files = FileSet::new()
        .with(ctx.verbatim(format!("{catalog}/Contents.json"), ASSET_CATALOG)?)
        .with(ctx.verbatim(
            format!("{catalog}/AppIcon.appiconset/Contents.json"),
            APP_ICON,
        )?)
        .with(ctx.verbatim(
            format!("{catalog}/AccentColor.colorset/Contents.json"),
            ACCENT_COLOR,
        )?);
    emit(ctx, files)
}

fn project_files(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.verbatim(".gitignore", GITIGNORE)?)
        .with(ctx.render(
            "common/README.md",
            "README.md",
            json!({
                "platform": "iOS",
                "run": [format!("open {}.xcodeproj", ctx.project().pascal)],
            }),
        )?))
}
