//! Built-in template set.
//!
//! Every template the platform generators reference ships inside the binary.
//! Names are paths relative to `templates/` without the `.hbs` suffix, so
//! `templates/express/index.ts.hbs` is registered as `express/index.ts`.
//!
//! # Overrides
//!
//! Set `$APPFORGE_TEMPLATES_DIR` to a directory laid out the same way. Any
//! template found there replaces the built-in one of the same name; names
//! the generators never reference are registered but unused.
//!
//! ```env
//! APPFORGE_TEMPLATES_DIR=./my-templates
//! ```

use std::path::PathBuf;

use tracing::debug;

/// Environment variable naming an override directory.
pub const TEMPLATES_DIR_ENV: &str = "APPFORGE_TEMPLATES_DIR";

macro_rules! builtin {
    ($name:literal) => {
        ($name, include_str!(concat!("../templates/", $name, ".hbs")))
    };
}

/// `(name, source)` for every shipped template, sorted by name.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    builtin!("android/AndroidManifest.xml"),
    builtin!("android/ApiClient.kt"),
    builtin!("android/ApiService.kt"),
    builtin!("android/MainActivity.kt"),
    builtin!("android/Model.kt"),
    builtin!("android/Screen.kt"),
    builtin!("android/Theme.kt"),
    builtin!("android/app.build.gradle.kts"),
    builtin!("android/build.gradle.kts"),
    builtin!("android/colors.xml"),
    builtin!("android/gradle-wrapper.properties"),
    builtin!("android/gradle.properties"),
    builtin!("android/settings.gradle.kts"),
    builtin!("android/strings.xml"),
    builtin!("android/themes.xml"),
    builtin!("common/README.md"),
    builtin!("express/config.ts"),
    builtin!("express/controller.ts"),
    builtin!("express/env.example"),
    builtin!("express/errorHandler.ts"),
    builtin!("express/index.ts"),
    builtin!("express/logger.ts"),
    builtin!("express/package.json"),
    builtin!("express/routes-index.ts"),
    builtin!("express/routes.ts"),
    builtin!("express/tsconfig.json"),
    builtin!("fastapi/controller.py"),
    builtin!("fastapi/env.example"),
    builtin!("fastapi/error_handler.py"),
    builtin!("fastapi/logger.py"),
    builtin!("fastapi/main.py"),
    builtin!("fastapi/model.py"),
    builtin!("fastapi/pyproject.toml"),
    builtin!("fastapi/requirements.txt"),
    builtin!("fastapi/routes.py"),
    builtin!("fastapi/settings.py"),
    builtin!("flutter/api_service.dart"),
    builtin!("flutter/app_config.dart"),
    builtin!("flutter/home_screen.dart"),
    builtin!("flutter/main.dart"),
    builtin!("flutter/model.dart"),
    builtin!("flutter/pubspec.yaml"),
    builtin!("flutter/screen.dart"),
    builtin!("flutter/widget_test.dart"),
    builtin!("ios/APIClient.swift"),
    builtin!("ios/App.swift"),
    builtin!("ios/ContentView.swift"),
    builtin!("ios/Info.plist"),
    builtin!("ios/Model.swift"),
    builtin!("ios/PersistenceController.swift"),
    builtin!("ios/View.swift"),
    builtin!("ios/project.pbxproj"),
    builtin!("ios/xcdatamodel.contents"),
    builtin!("react-native/App.tsx"),
    builtin!("react-native/AppNavigator.tsx"),
    builtin!("react-native/HomeScreen.tsx"),
    builtin!("react-native/Screen.tsx"),
    builtin!("react-native/api.ts"),
    builtin!("react-native/app.json"),
    builtin!("react-native/config.ts"),
    builtin!("react-native/package.json"),
    builtin!("react-native/tsconfig.json"),
    builtin!("typescript/model.ts"),
    builtin!("typescript/models-index.ts"),
];

/// Override directory from the environment, if set and non-empty.
pub fn override_dir() -> Option<PathBuf> {
    let dir = std::env::var_os(TEMPLATES_DIR_ENV)?;
    if dir.is_empty() {
        return None;
    }
    let dir = PathBuf::from(dir);
    debug!(path = %dir.display(), env = TEMPLATES_DIR_ENV, "template override directory");
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_sorted() {
        let names: Vec<&str> = BUILTIN_TEMPLATES.iter().map(|(n, _)| *n).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(sorted, names);
    }

    #[test]
    fn every_platform_directory_is_present() {
        for dir in [
            "android/", "ios/", "react-native/", "flutter/", "express/", "fastapi/",
            "typescript/", "common/",
        ] {
            assert!(
                BUILTIN_TEMPLATES.iter().any(|(n, _)| n.starts_with(dir)),
                "no templates under {dir}"
            );
        }
    }

    #[test]
    fn sources_are_non_empty() {
        for (name, source) in BUILTIN_TEMPLATES {
            assert!(!source.trim().is_empty(), "{name} is empty");
        }
    }
}
