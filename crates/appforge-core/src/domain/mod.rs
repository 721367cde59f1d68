// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for appforge.
//!
//! Pure logic: the case library, the validated project descriptor, targets
//! and type mapping, generated files, and the identifier graph. All I/O and
//! templating happen behind ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: descriptors and generated files are never mutated
//!   after construction

pub mod case;
pub mod common;
pub mod descriptor;
pub mod error;
pub mod generated;
pub mod identifier_graph;
pub mod value_objects;

mod validation;

pub use common::RelativePath;
pub use descriptor::{
    ApiEndpoint, Column, ComponentKind, DatabaseSchema, DescriptorDocument, Metadata, Parameter,
    PathSegment, ProjectDescriptor, Table, UiComponent,
};
pub use error::{DomainError, ErrorCategory};
pub use generated::{FileOrigin, FileSet, GeneratedFile};
pub use identifier_graph::{
    ChaChaIdSource, IdSource, IdentifierGraph, OBJECT_ID_WIDTH, ObjectId, Role, SymbolTable,
};
pub use validation::DomainValidator;
pub use value_objects::{ColumnType, HttpMethod, Language, Target, TargetFamily};
