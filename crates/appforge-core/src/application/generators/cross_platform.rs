//! Cross-platform mobile: React Native (Expo, TypeScript) and Flutter.

use serde_json::json;

use super::{GenerationContext, PlatformGenerator, Requirement, Step};
use crate::{
    domain::{FileSet, Target},
    error::ForgeResult,
};

const RN_GITIGNORE: &str = "\
node_modules/
.expo/
dist/
web-build/
npm-debug.*
*.jks
*.p8
*.p12
*.key
*.mobileprovision
.DS_Store
";

const BABEL_CONFIG: &str = "\
module.exports = function (api) {
  api.cache(true);
  return {
    presets: ['babel-preset-expo'],
  };
};
";

const FLUTTER_GITIGNORE: &str = "\
.dart_tool/
.packages
.pub-cache/
.pub/
build/
.flutter-plugins
.flutter-plugins-dependencies
.idea/
.DS_Store
";

const ANALYSIS_OPTIONS: &str = "\
include: package:flutter_lints/flutter.yaml

linter:
  rules:
    prefer_const_constructors: true
    prefer_final_fields: true
";

// ============================================================================
// React Native
// ============================================================================

pub struct ReactNativeGenerator;

impl PlatformGenerator for ReactNativeGenerator {
    fn target(&self) -> Target {
        Target::ReactNative
    }

    fn skeleton(&self) -> &'static [&'static str] {
        &[
            "src/components",
            "src/screens",
            "src/services",
            "src/models",
            "src/navigation",
            "src/utils",
            "assets",
        ]
    }

    fn steps(&self) -> Vec<Step> {
        vec![
            Step::new("manifest", Requirement::Always, rn_manifest),
            Step::new("entry-point", Requirement::Always, rn_entry_point),
            Step::new("data-models", Requirement::Schema, rn_models),
            Step::new("api-client", Requirement::Endpoints, rn_api_client),
            Step::new("screens", Requirement::Components, rn_screens),
            Step::new("project-files", Requirement::Always, rn_project_files),
        ]
    }
}

fn rn_manifest(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.render_project("react-native/package.json", "package.json")?)
        .with(ctx.render_project("react-native/app.json", "app.json")?)
        .with(ctx.render_project("react-native/tsconfig.json", "tsconfig.json")?)
        .with(ctx.verbatim("babel.config.js", BABEL_CONFIG)?))
}

fn rn_entry_point(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.render_project("react-native/App.tsx", "App.tsx")?)
        .with(ctx.render_project(
            "react-native/AppNavigator.tsx",
            "src/navigation/AppNavigator.tsx",
        )?)
        .with(ctx.render_project("react-native/HomeScreen.tsx", "src/screens/HomeScreen.tsx")?)
        .with(ctx.render_project("react-native/config.ts", "src/utils/config.ts")?))
}

fn rn_models(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for model in &ctx.project().models {
        files.push(ctx.render(
            "typescript/model.ts",
            format!("src/models/{}.ts", model.name),
            json!({ "model": model }),
        )?);
    }
    files.push(ctx.render_project("typescript/models-index.ts", "src/models/index.ts")?);
    Ok(files)
}

fn rn_api_client(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new().with(ctx.render_project("react-native/api.ts", "src/services/api.ts")?))
}

fn rn_screens(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for component in &ctx.project().components {
        files.push(ctx.render(
            "react-native/Screen.tsx",
            format!("src/screens/{}Screen.tsx", component.name),
            json!({ "component": component }),
        )?);
    }
    Ok(files)
}

fn rn_project_files(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.verbatim(".gitignore", RN_GITIGNORE)?)
        .with(ctx.render(
            "common/README.md",
            "README.md",
            json!({
                "platform": "React Native (Expo)",
                "run": ["npm install", "npx expo start"],
            }),
        )?))
}

// ============================================================================
// Flutter
// ============================================================================

pub struct FlutterGenerator;

impl PlatformGenerator for FlutterGenerator {
    fn target(&self) -> Target {
        Target::Flutter
    }

    fn skeleton(&self) -> &'static [&'static str] {
        &["lib/models", "lib/screens", "lib/services", "lib/config", "test"]
    }

    fn steps(&self) -> Vec<Step> {
        vec![
            Step::new("manifest", Requirement::Always, flutter_manifest),
            Step::new("entry-point", Requirement::Always, flutter_entry_point),
            Step::new("data-models", Requirement::Schema, flutter_models),
            Step::new("api-client", Requirement::Endpoints, flutter_api_client),
            Step::new("screens", Requirement::Components, flutter_screens),
            Step::new("project-files", Requirement::Always, flutter_project_files),
        ]
    }
}

fn flutter_manifest(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.render_project("flutter/pubspec.yaml", "pubspec.yaml")?)
        .with(ctx.verbatim("analysis_options.yaml", ANALYSIS_OPTIONS)?))
}

fn flutter_entry_point(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.render_project("flutter/main.dart", "lib/main.dart")?)
        .with(ctx.render_project("flutter/app_config.dart", "lib/config/app_config.dart")?)
        .with(ctx.render_project("flutter/home_screen.dart", "lib/screens/home_screen.dart")?)
        .with(ctx.render_project("flutter/widget_test.dart", "test/widget_test.dart")?))
}

fn flutter_models(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for model in &ctx.project().models {
        files.push(ctx.render(
            "flutter/model.dart",
            format!("lib/models/{}.dart", model.name),
            json!({ "model": model }),
        )?);
    }
    Ok(files)
}

fn flutter_api_client(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new().with(
        ctx.render_project("flutter/api_service.dart", "lib/services/api_service.dart")?,
    ))
}

fn flutter_screens(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for component in &ctx.project().components {
        files.push(ctx.render(
            "flutter/screen.dart",
            format!("lib/screens/{}_screen.dart", component.snake),
            json!({ "component": component }),
        )?);
    }
    Ok(files)
}

fn flutter_project_files(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.verbatim(".gitignore", FLUTTER_GITIGNORE)?)
        .with(ctx.render(
            "common/README.md",
            "README.md",
            json!({
                "platform": "Flutter",
                "run": ["flutter pub get", "flutter run"],
            }),
        )?))
}
