//! Core abstractions shared with the host scaffolding pipeline.
//!
//! - [`schema`]: the database model the host builds and this crate annotates
//! - [`annotations`]: key/value metadata attached to model nodes
//! - [`traits`]: the host slots (type mapping, model factory, code generator)
//!   and the catalog client used by enrichment

pub mod annotations;
pub mod schema;
pub mod traits;

pub use annotations::{AnnotationKey, AnnotationValue, Annotations};
pub use schema::{DatabaseColumn, DatabaseIndex, DatabaseModel, DatabaseTable};
pub use traits::{
    CatalogClient, CatalogIndexRecord, CodeGenerator, GeneratedFile, GenerationOptions,
    ModelFactory, ModelFactoryOptions, ScaffoldedModel, TypeMappingSource,
};
