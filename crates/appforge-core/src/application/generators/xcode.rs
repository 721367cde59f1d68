//! Xcode project-file model.
//!
//! Maps generated files onto `project.pbxproj` entries and builds the
//! template context for it. Every identifier placed in the context is read
//! from the run's [`SymbolTable`]; nothing here draws an identifier itself.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    domain::{FileSet, IdentifierGraph, RelativePath, Role, SymbolTable, case},
    error::ForgeResult,
};

/// Roles every iOS project file needs, allocated before any step runs.
pub(super) const FIXED_ROLES: [&str; 20] = [
    "project",
    "main-group",
    "products-group",
    "app-group",
    "models-group",
    "views-group",
    "services-group",
    "core-data-group",
    "resources-group",
    "app-product",
    "main-target",
    "sources-phase",
    "resources-phase",
    "frameworks-phase",
    "project-config-list",
    "target-config-list",
    "project-debug-config",
    "project-release-config",
    "target-debug-config",
    "target-release-config",
];

/// App subgroups in display order: (directory, role).
pub(super) const GROUPS: [(&str, &str); 5] = [
    ("Models", "models-group"),
    ("Views", "views-group"),
    ("Services", "services-group"),
    ("Core Data", "core-data-group"),
    ("Resources", "resources-group"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Phase {
    Sources,
    Resources,
    /// Referenced but not built (Info.plist).
    None,
}

/// One file reference in the project file. Bundles (`.xcassets`,
/// `.xcdatamodeld`) collapse to a single item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct ProjectItem {
    /// Path relative to the output root, e.g. `Acme/Views/ContentView.swift`.
    pub path: String,
    /// Subgroup directory, `None` for files directly in the app group.
    pub group: Option<&'static str>,
    pub name: String,
    pub file_type: &'static str,
    pub phase: Phase,
}

/// Classify a generated path. Files outside `<product>/` are not part of the
/// Xcode project.
pub(super) fn project_item(product: &str, path: &RelativePath) -> Option<ProjectItem> {
    let full = path.to_slash_string();
    let rest = full.strip_prefix(product)?.strip_prefix('/')?;
    let parts: Vec<&str> = rest.split('/').collect();

    let group = GROUPS
        .iter()
        .map(|(dir, _)| *dir)
        .find(|dir| parts.len() > 1 && parts[0] == *dir);
    let within = if group.is_some() { &parts[1..] } else { &parts[..] };

    if let Some(pos) = within
        .iter()
        .position(|p| p.ends_with(".xcassets") || p.ends_with(".xcdatamodeld"))
    {
        let bundle = within[pos];
        let prefix_len = parts.len() - within.len() + pos + 1;
        let (file_type, phase) = if bundle.ends_with(".xcassets") {
            ("folder.assetcatalog", Phase::Resources)
        } else {
            ("wrapper.xcdatamodeld", Phase::Sources)
        };
        return Some(ProjectItem {
            path: format!("{product}/{}", parts[..prefix_len].join("/")),
            group,
            name: bundle.to_string(),
            file_type,
            phase,
        });
    }

    // Nested directories other than bundles are not modelled.
    if within.len() != 1 {
        return None;
    }
    let name = within[0].to_string();
    let (file_type, phase) = if name.ends_with(".swift") {
        ("sourcecode.swift", Phase::Sources)
    } else if name == "Info.plist" {
        ("text.plist.xml", Phase::None)
    } else if name.ends_with(".json") {
        ("text.json", Phase::Resources)
    } else {
        ("text", Phase::Resources)
    };
    Some(ProjectItem {
        path: full,
        group,
        name,
        file_type,
        phase,
    })
}

pub(super) fn project_items(product: &str, files: &FileSet) -> BTreeSet<ProjectItem> {
    files
        .paths()
        .filter_map(|p| project_item(product, p))
        .collect()
}

/// Register file roles for everything in `files` that belongs to the project.
pub(super) fn register_items(
    graph: &IdentifierGraph,
    product: &str,
    files: &FileSet,
) -> ForgeResult<()> {
    for item in project_items(product, files) {
        graph.register(Role::file_ref(&item.path))?;
        if item.phase != Phase::None {
            graph.register(Role::file_build(&item.path))?;
        }
    }
    Ok(())
}

/// Quote a pbxproj string value when it contains anything beyond
/// `[A-Za-z0-9._/]`.
pub(super) fn pbx_quote(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/'));
    if bare {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChildRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FileEntry {
    pub ref_id: String,
    pub build_id: Option<String>,
    pub name: String,
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GroupEntry {
    pub id: String,
    pub path: String,
    pub children: Vec<ChildRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PbxprojContext {
    /// Fixed roles keyed by `snake(role)`.
    pub ids: BTreeMap<String, String>,
    pub product_name: String,
    pub product_file: String,
    pub bundle_identifier: String,
    pub deployment_target: &'static str,
    pub files: Vec<FileEntry>,
    pub app_children: Vec<ChildRef>,
    pub groups: Vec<GroupEntry>,
    pub sources: Vec<FileEntry>,
    pub resources: Vec<FileEntry>,
    pub info_plist: String,
}

/// Build the template context from the symbol table and the generated files.
pub(super) fn pbxproj_context(
    table: &SymbolTable,
    product: &str,
    bundle_identifier: &str,
    files: &FileSet,
) -> ForgeResult<PbxprojContext> {
    let mut ids = BTreeMap::new();
    for role in FIXED_ROLES {
        ids.insert(case::snake(role), table.resolve(role)?.to_string());
    }

    let mut entries = Vec::new();
    let mut sources = Vec::new();
    let mut resources = Vec::new();
    let mut app_children = Vec::new();
    let mut grouped: BTreeMap<&str, Vec<ChildRef>> = BTreeMap::new();

    for item in project_items(product, files) {
        let ref_id = table.resolve(Role::file_ref(&item.path).as_str())?.to_string();
        let build_id = match item.phase {
            Phase::None => None,
            _ => Some(table.resolve(Role::file_build(&item.path).as_str())?.to_string()),
        };
        let entry = FileEntry {
            ref_id: ref_id.clone(),
            build_id,
            name: pbx_quote(&item.name),
            file_type: item.file_type.to_string(),
        };
        let child = ChildRef {
            id: ref_id,
            name: item.name.clone(),
        };
        match item.group {
            Some(group) => grouped.entry(group).or_default().push(child),
            None => app_children.push(child),
        }
        match item.phase {
            Phase::Sources => sources.push(entry.clone()),
            Phase::Resources => resources.push(entry.clone()),
            Phase::None => {}
        }
        entries.push(entry);
    }

    let mut groups = Vec::new();
    for (dir, role) in GROUPS {
        let id = table.resolve(role)?.to_string();
        app_children.push(ChildRef {
            id: id.clone(),
            name: dir.to_string(),
        });
        groups.push(GroupEntry {
            id,
            path: pbx_quote(dir),
            children: grouped.remove(dir).unwrap_or_default(),
        });
    }

    Ok(PbxprojContext {
        ids,
        product_name: pbx_quote(product),
        product_file: pbx_quote(&format!("{product}.app")),
        bundle_identifier: bundle_identifier.to_string(),
        deployment_target: "16.0",
        files: entries,
        app_children,
        groups,
        sources,
        resources,
        info_plist: pbx_quote(&format!("{product}/Info.plist")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeneratedFile;

    fn path(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    #[test]
    fn classifies_sources_bundles_and_outsiders() {
        let swift = project_item("Acme", &path("Acme/Views/ContentView.swift")).unwrap();
        assert_eq!(swift.group, Some("Views"));
        assert_eq!(swift.phase, Phase::Sources);

        let asset = project_item(
            "Acme",
            &path("Acme/Resources/Assets.xcassets/AppIcon.appiconset/Contents.json"),
        )
        .unwrap();
        assert_eq!(asset.path, "Acme/Resources/Assets.xcassets");
        assert_eq!(asset.name, "Assets.xcassets");
        assert_eq!(asset.phase, Phase::Resources);

        let model = project_item(
            "Acme",
            &path("Acme/Core Data/Acme.xcdatamodeld/Acme.xcdatamodel/contents"),
        )
        .unwrap();
        assert_eq!(model.path, "Acme/Core Data/Acme.xcdatamodeld");
        assert_eq!(model.group, Some("Core Data"));

        let plist = project_item("Acme", &path("Acme/Info.plist")).unwrap();
        assert_eq!(plist.phase, Phase::None);
        assert_eq!(plist.group, None);

        assert!(project_item("Acme", &path("README.md")).is_none());
        assert!(project_item("Acme", &path("AcmeTests/Foo.swift")).is_none());
    }

    #[test]
    fn quotes_values_with_spaces() {
        assert_eq!(pbx_quote("Core Data"), "\"Core Data\"");
        assert_eq!(pbx_quote("AcmeApp.swift"), "AcmeApp.swift");
        assert_eq!(pbx_quote(""), "\"\"");
    }

    #[test]
    fn context_resolves_every_file_role() {
        let graph = IdentifierGraph::seeded(5);
        graph.allocate(&FIXED_ROLES).unwrap();
        let files = FileSet::new()
            .with(GeneratedFile::verbatim(path("Acme/AcmeApp.swift"), ""))
            .with(GeneratedFile::verbatim(path("Acme/Info.plist"), ""))
            .with(GeneratedFile::verbatim(path("Acme/Resources/Assets.xcassets/Contents.json"), ""))
            .with(GeneratedFile::verbatim(
                path("Acme/Resources/Assets.xcassets/AccentColor.colorset/Contents.json"),
                "",
            ));
        register_items(&graph, "Acme", &files).unwrap();
        let table = graph.snapshot().unwrap();
        // 20 fixed + swift (2) + plist (1) + asset catalog (2)
        assert_eq!(table.len(), 25);

        let ctx = pbxproj_context(&table, "Acme", "com.acme.Acme", &files).unwrap();
        assert_eq!(ctx.files.len(), 3);
        assert_eq!(ctx.sources.len(), 1);
        assert_eq!(ctx.resources.len(), 1);
        assert_eq!(ctx.groups.len(), 5);
        assert_eq!(ctx.app_children.len(), 2 + 5);
        assert!(ctx.ids.contains_key("main_target"));
    }

    #[test]
    fn missing_file_role_is_unresolved() {
        let graph = IdentifierGraph::seeded(5);
        graph.allocate(&FIXED_ROLES).unwrap();
        let files = FileSet::new().with(GeneratedFile::verbatim(path("Acme/AcmeApp.swift"), ""));
        let table = graph.snapshot().unwrap();
        assert!(pbxproj_context(&table, "Acme", "com.acme.Acme", &files).is_err());
    }
}
