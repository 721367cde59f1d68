//! appforge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the appforge
//! source generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           appforge-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerationService, CatalogService)    │
//! │   Platform generators (step pipelines)  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (TemplateRegistry, Filesystem, Packager)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    appforge-adapters (Infrastructure)   │
//! │ (HandlebarsRegistry, LocalFilesystem,   │
//! │  ZipPackager)                           │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProjectDescriptor, Target, case, FileSet│
//! │  IdentifierGraph)                       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use appforge_core::prelude::*;
//!
//! let document: DescriptorDocument = serde_json::from_str(json)?;
//! let service = GenerationService::new(registry, filesystem, packager, GenerationOptions::default());
//! let report = service.generate_document(document, "./out")?;
//! println!("{}", report.archive.archive_path.display());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CatalogService, GenerationOptions, GenerationReport, GenerationService, Preview,
        TargetInfo,
        ports::{Filesystem, PackageReceipt, Packager, TemplateRegistry},
    };
    pub use crate::domain::{
        DescriptorDocument, FileSet, GeneratedFile, IdentifierGraph, Language, ProjectDescriptor,
        RelativePath, Target, case,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
