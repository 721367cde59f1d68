//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer, the platform generators and the
//! ports to accomplish high-level use cases like "generate and package a
//! project" or "list supported targets".

pub mod catalog_service;
pub mod directory_tree;
pub mod generation_service;

pub use catalog_service::{CatalogService, TargetInfo};
pub use directory_tree::DirectoryTreeBuilder;
pub use generation_service::{GenerationOptions, GenerationReport, GenerationService, Preview};
