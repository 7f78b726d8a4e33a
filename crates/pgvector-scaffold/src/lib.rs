//! # pgvector-scaffold
//!
//! pgvector support for reverse-engineering PostgreSQL schemas into
//! Entity Framework Core models.
//!
//! The host scaffolder introspects the database and emits C# source. This
//! library plugs into three of its extension points:
//!
//! - **Type mapping**: `vector`, `halfvec` and `sparsevec` store types
//!   resolve to `Pgvector.Vector`, `Pgvector.HalfVector` and
//!   `Pgvector.SparseVector`
//! - **Model enrichment**: column dimensions and vector index access
//!   methods / operator classes are read from `pg_catalog` and attached to
//!   the model as annotations
//! - **Source rewriting**: the generated context enables `UseVector()` on
//!   the Npgsql provider and reads its connection string from configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use pgvector_scaffold::{ScaffoldConfig, VectorScaffoldPlugin};
//!
//! # fn main() -> pgvector_scaffold::Result<()> {
//! let config = ScaffoldConfig::load("scaffold.yaml")?;
//! pgvector_scaffold::logging::init(&config.logging)?;
//! let plugin = VectorScaffoldPlugin::new(config);
//! let mapping = plugin.type_mapping_source().find_mapping("vector(1536)");
//! assert!(mapping.is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod enrich;
pub mod error;
pub mod logging;
pub mod plugin;
pub mod render;
pub mod rewrite;
pub mod storetype;
pub mod typemap;

// Re-exports for convenient access
pub use config::{EnrichmentConfig, LoggingConfig, RewriteConfig, ScaffoldConfig};
pub use core::{
    AnnotationKey, AnnotationValue, Annotations, CatalogClient, CatalogIndexRecord,
    CodeGenerator, DatabaseColumn, DatabaseIndex, DatabaseModel, DatabaseTable, GeneratedFile,
    GenerationOptions, ModelFactory, ModelFactoryOptions, ScaffoldedModel, TypeMappingSource,
};
pub use enrich::{CatalogEnricher, EnrichmentSummary};
pub use error::{CatalogQuery, Result, ScaffoldError};
pub use plugin::{EnrichingModelFactory, RewritingCodeGenerator, VectorScaffoldPlugin};
pub use rewrite::SourceRewriter;
pub use storetype::{StoreTypeDescriptor, VectorKind};
pub use typemap::{TypeMapping, TypeTag, VectorTypeMappingSource};
