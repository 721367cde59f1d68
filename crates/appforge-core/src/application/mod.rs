//! Application layer for appforge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, CatalogService)
//! - **Generators**: One step pipeline per target
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Descriptor rules live in `crate::domain`; this layer decides what files
//! a target gets and in which order things touch the filesystem.

pub mod error;
pub mod generators;
pub mod ports;
pub mod services;

pub use services::{
    CatalogService, DirectoryTreeBuilder, GenerationOptions, GenerationReport, GenerationService,
    Preview, TargetInfo,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, PackageReceipt, Packager, TemplateRegistry};

pub use error::ApplicationError;
