//! Integration tests for appforge-core.
//!
//! Drives the public API with small in-test port implementations; the real
//! templates are exercised from appforge-adapters.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use appforge_core::application::generators::{self, GenerationContext};
use appforge_core::domain::OBJECT_ID_WIDTH;
use appforge_core::prelude::*;

/// Renders `name` followed by the JSON context, so tests can see both.
struct DumpRegistry;

impl TemplateRegistry for DumpRegistry {
    fn compile(&self, name: &str, context: &serde_json::Value) -> ForgeResult<String> {
        Ok(format!("{name}\n{context}"))
    }

    fn compile_str(&self, source: &str, context: &serde_json::Value) -> ForgeResult<String> {
        let project = &context["project"];
        Ok(source
            .replace("{{project.pascal}}", project["pascal"].as_str().unwrap_or_default())
            .replace(
                "{{project.identifierPath}}",
                project["identifierPath"].as_str().unwrap_or_default(),
            ))
    }

    fn has_template(&self, _name: &str) -> bool {
        true
    }

    fn template_names(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Default)]
struct RecordingFilesystem {
    written: Mutex<Vec<PathBuf>>,
}

impl Filesystem for RecordingFilesystem {
    fn create_dir_all(&self, _path: &Path) -> ForgeResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, _content: &str) -> ForgeResult<()> {
        self.written.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn remove_dir_all(&self, _path: &Path) -> ForgeResult<()> {
        Ok(())
    }
}

struct NoopPackager;

impl Packager for NoopPackager {
    fn archive_path(&self, display_name: &str, destination: &Path) -> PathBuf {
        destination.join(format!("{}.zip", case::kebab(display_name)))
    }

    fn package(
        &self,
        _source_root: &Path,
        display_name: &str,
        destination: &Path,
    ) -> ForgeResult<PackageReceipt> {
        Ok(PackageReceipt {
            archive_path: self.archive_path(display_name, destination),
            size_bytes: 0,
            entries: 0,
        })
    }
}

fn service(seed: u64) -> GenerationService {
    GenerationService::new(
        Box::new(DumpRegistry),
        Box::new(RecordingFilesystem::default()),
        Box::new(NoopPackager),
        GenerationOptions {
            scratch_base: PathBuf::from("/scratch"),
            seed: Some(seed),
            ..GenerationOptions::default()
        },
    )
}

fn descriptor(target: &str, tables: usize) -> ProjectDescriptor {
    let tables: Vec<_> = (0..tables)
        .map(|i| {
            serde_json::json!({
                "name": format!("table_{i}"),
                "columns": [{ "name": "id", "type": "uuid" }, { "name": "created_at", "type": "datetime", "nullable": true }]
            })
        })
        .collect();
    let doc: DescriptorDocument = serde_json::from_value(serde_json::json!({
        "name": "Acme Shop",
        "platformIdentifier": "com.acme.shop",
        "target": target,
        "databaseSchema": { "tables": tables },
        "apiEndpoints": [
            { "path": "/api/orders", "method": "GET", "returnType": "Table0[]" },
            { "path": "/api/orders/{id}", "method": "PUT", "returnType": "Table0" }
        ],
        "uiComponents": [{ "name": "order_list", "kind": "list" }]
    }))
    .unwrap();
    ProjectDescriptor::from_document(doc).unwrap()
}

fn model_paths(files: &FileSet, target: Target) -> Vec<String> {
    let dir = match target {
        Target::Android => "app/src/main/java/com/acme/shop/data/model/",
        Target::Ios => "AcmeShop/Models/",
        Target::Flutter => "lib/models/",
        _ => "src/models/",
    };
    files
        .path_set()
        .into_iter()
        .filter(|p| p.starts_with(dir))
        .filter(|p| !p.ends_with("index.ts") && !p.ends_with("__init__.py"))
        .collect()
}

#[test]
fn every_target_emits_one_model_per_table() {
    for target in Target::ALL {
        for tables in [0, 1, 3] {
            let d = descriptor(target.as_str(), tables);
            let preview = service(7).preview(&d).unwrap();
            assert_eq!(
                model_paths(&preview.files, target).len(),
                tables,
                "{target} with {tables} tables"
            );
        }
    }
}

#[test]
fn path_sets_are_deterministic() {
    for target in Target::ALL {
        let d = descriptor(target.as_str(), 2);
        let a = service(1).preview(&d).unwrap();
        let b = service(2).preview(&d).unwrap();
        assert_eq!(a.paths(), b.paths(), "{target}");
    }
}

#[test]
fn same_seed_gives_identical_ios_project() {
    let d = descriptor("ios", 2);
    let a = service(42).preview(&d).unwrap();
    let b = service(42).preview(&d).unwrap();
    assert_eq!(a.files, b.files);

    let c = service(43).preview(&d).unwrap();
    let path = "AcmeShop.xcodeproj/project.pbxproj";
    assert_ne!(
        a.files.get(path).unwrap().content(),
        c.files.get(path).unwrap().content()
    );
}

#[test]
fn ios_project_context_only_uses_allocated_identifiers() {
    let d = descriptor("ios", 1);
    let registry = DumpRegistry;
    let ctx = GenerationContext::new(&d, &registry, "/scratch/x")
        .with_identifiers(IdentifierGraph::seeded(3));
    let files = generators::for_target(Target::Ios).generate(&ctx).unwrap();
    let table = ctx.identifiers().unwrap().snapshot().unwrap();

    let pbx = files.get("AcmeShop.xcodeproj/project.pbxproj").unwrap();
    assert!(table.unresolved_tokens(pbx.content()).is_empty());
    assert!(table.iter().all(|(_, id)| id.to_string().len() == OBJECT_ID_WIDTH));
    assert!(table.get("main-target").is_some());
}

#[test]
fn generate_writes_every_file_under_scratch() {
    let d = descriptor("backend-fastapi", 1);
    let fs = RecordingFilesystem::default();
    let preview = service(1).preview(&d).unwrap();

    let svc = GenerationService::new(
        Box::new(DumpRegistry),
        Box::new(fs),
        Box::new(NoopPackager),
        GenerationOptions {
            scratch_base: PathBuf::from("/scratch"),
            ..GenerationOptions::default()
        },
    );
    let report = svc.generate(&d, "/out").unwrap();
    assert_eq!(report.files, preview.files.len());
    assert_eq!(report.archive.archive_path, PathBuf::from("/out/acme-shop.zip"));
    assert!(report.paths.contains(&"src/models/Table0.py".to_string()));
    assert!(report.paths.contains(&"src/routes/orders.py".to_string()));
}
