//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `appforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: scratch-directory operations
//!   - `TemplateRegistry`: named templates plus case helpers
//!   - `Packager`: archives a finished tree
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Filesystem, PackageReceipt, Packager, TemplateRegistry};

#[cfg(test)]
pub use output::{MockFilesystem, MockPackager, MockTemplateRegistry};
