//! Generation against the real filesystem and zip packager.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use appforge_adapters::{HandlebarsRegistry, LocalFilesystem, ZipPackager};
use appforge_core::application::ApplicationError;
use appforge_core::prelude::*;
use serde_json::json;
use tempfile::TempDir;

struct Workspace {
    scratch: TempDir,
    out: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            scratch: TempDir::new().unwrap(),
            out: TempDir::new().unwrap(),
        }
    }

    fn service(&self, overwrite: bool) -> GenerationService {
        GenerationService::new(
            Box::new(HandlebarsRegistry::with_builtin().unwrap()),
            Box::new(LocalFilesystem::new()),
            Box::new(ZipPackager::new()),
            GenerationOptions {
                scratch_base: self.scratch.path().to_path_buf(),
                seed: Some(11),
                overwrite,
                ..GenerationOptions::default()
            },
        )
    }

    fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch.path()).unwrap().next().is_none()
    }
}

fn descriptor(target: &str) -> ProjectDescriptor {
    let doc: DescriptorDocument = serde_json::from_value(json!({
        "name": "Acme Shop",
        "platformIdentifier": "com.acme.shop",
        "target": target,
        "databaseSchema": { "tables": [
            { "name": "customer", "columns": [{ "name": "email", "type": "string" }] }
        ]},
        "apiEndpoints": [{ "path": "/api/customers/{id}", "method": "GET", "returnType": "Customer" }]
    }))
    .unwrap();
    ProjectDescriptor::from_document(doc).unwrap()
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn archive_text(path: &Path, member: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut file = archive.by_name(member).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

#[test]
fn packages_every_file_and_removes_scratch() {
    let ws = Workspace::new();
    let report = ws
        .service(false)
        .generate(&descriptor("backend-fastapi"), ws.out.path())
        .unwrap();

    let archive = ws.out.path().join("acme-shop.zip");
    assert_eq!(report.archive.archive_path, archive);
    assert_eq!(report.archive.size_bytes, std::fs::metadata(&archive).unwrap().len());
    assert!(ws.scratch_is_empty());

    let names = archive_names(&archive);
    assert_eq!(report.archive.entries, names.len());
    for path in &report.paths {
        assert!(names.contains(path), "{path} missing from archive");
    }
    for name in &names {
        assert!(!name.starts_with('/') && !name.contains(".."), "{name}");
        assert!(!name.contains('\\'), "{name}");
    }
    assert!(archive_text(&archive, "src/models/Customer.py").contains("class Customer(BaseModel)"));
}

#[test]
fn empty_skeleton_directories_are_archived() {
    let ws = Workspace::new();
    let report = ws
        .service(false)
        .generate(&descriptor("react-native"), ws.out.path())
        .unwrap();
    let names = archive_names(&report.archive.archive_path);
    // No generated file lives under src/components, only the skeleton.
    assert!(names.contains(&"src/components/".to_string()));
    assert!(names.contains(&"src/screens/".to_string()));
}

#[test]
fn ios_archive_keeps_spaces_in_paths() {
    let ws = Workspace::new();
    let report = ws
        .service(false)
        .generate(&descriptor("ios"), ws.out.path())
        .unwrap();
    let names = archive_names(&report.archive.archive_path);
    assert!(names.contains(&"AcmeShop/Core Data/".to_string()));
    assert!(names.contains(&"AcmeShop.xcodeproj/project.pbxproj".to_string()));
    assert!(
        names.contains(
            &"AcmeShop/Core Data/AcmeShop.xcdatamodeld/AcmeShop.xcdatamodel/contents".to_string()
        )
    );
}

#[test]
fn existing_archive_is_kept_without_overwrite() {
    let ws = Workspace::new();
    let archive = ws.out.path().join("acme-shop.zip");
    std::fs::write(&archive, b"keep me").unwrap();

    let err = ws
        .service(false)
        .generate(&descriptor("flutter"), ws.out.path())
        .unwrap_err();
    assert!(matches!(
        err,
        ForgeError::Application(ApplicationError::ArchiveExists { .. })
    ));
    assert_eq!(std::fs::read(&archive).unwrap(), b"keep me");
    assert!(ws.scratch_is_empty());

    ws.service(true)
        .generate(&descriptor("flutter"), ws.out.path())
        .unwrap();
    assert!(archive_names(&archive).contains(&"pubspec.yaml".to_string()));
}

#[test]
fn same_seed_produces_identical_archives() {
    let a = Workspace::new();
    let b = Workspace::new();
    let ra = a.service(false).generate(&descriptor("ios"), a.out.path()).unwrap();
    let rb = b.service(false).generate(&descriptor("ios"), b.out.path()).unwrap();
    assert_eq!(
        std::fs::read(ra.archive.archive_path).unwrap(),
        std::fs::read(rb.archive.archive_path).unwrap()
    );
}

#[test]
fn destination_directory_is_created() {
    let ws = Workspace::new();
    let nested = ws.out.path().join("builds/2026");
    let report = ws
        .service(false)
        .generate(&descriptor("android"), &nested)
        .unwrap();
    assert!(report.archive.archive_path.starts_with(&nested));
    assert!(report.archive.archive_path.is_file());
}
