//! Infrastructure adapters for appforge.
//!
//! This crate implements the ports defined in `appforge-core::application::ports`:
//!
//! - [`HandlebarsRegistry`]: `TemplateRegistry` over the built-in template
//!   set, optionally overridden from `$APPFORGE_TEMPLATES_DIR`
//! - [`LocalFilesystem`] and [`MemoryFilesystem`]: `Filesystem`
//! - [`ZipPackager`]: `Packager`
//!
//! plus [`descriptor_loader`] for reading JSON/TOML descriptor files.

pub mod builtin_templates;
pub mod descriptor_loader;
pub mod filesystem;
pub mod packager;
pub mod renderer;
pub mod template_loader;

pub use descriptor_loader::DescriptorFormat;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use packager::ZipPackager;
pub use renderer::HandlebarsRegistry;
