//! Integration surface with the host scaffolding pipeline.
//!
//! - [`TypeMappingSource`]: per-store-type mapping slot
//! - [`ModelFactory`]: builds the [`DatabaseModel`] from a live connection
//! - [`CodeGenerator`]: emits source files from the model
//! - [`CatalogClient`]: the catalog queries the enrichment pass needs
//!
//! The host owns the connection, the model and the generated text. This crate
//! wraps the host's factory and generator (see [`crate::plugin`]) rather than
//! reaching into their internals.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::typemap::TypeMapping;

use super::schema::DatabaseModel;

/// Type mapping slot consulted by the host once per column.
pub trait TypeMappingSource: Send + Sync {
    /// Map a store type name, or `None` to let the host apply its default.
    fn find_mapping(&self, store_type: &str) -> Option<TypeMapping>;
}

/// A row of the vector index metadata query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIndexRecord {
    /// Schema of the indexed table.
    pub schema: String,
    /// Indexed table name.
    pub table_name: String,
    /// Index name.
    pub index_name: String,
    /// Access method (`hnsw` or `ivfflat`).
    pub method: String,
    /// Operator class (e.g. `vector_cosine_ops`).
    pub operator_class: String,
}

/// Read-only catalog access over a connection the host has already opened.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Get the formatted type of a column, including type modifiers.
    ///
    /// Returns `None` if the column does not exist in the catalog.
    async fn column_store_type(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Option<String>>;

    /// List indexes using one of `access_methods` whose operator class name
    /// matches the SQL `LIKE` pattern `operator_class_pattern`.
    async fn vector_indexes(
        &self,
        access_methods: &[&str],
        operator_class_pattern: &str,
    ) -> Result<Vec<CatalogIndexRecord>>;
}

/// Filters the host applies while building its model.
#[derive(Debug, Clone, Default)]
pub struct ModelFactoryOptions {
    /// Schemas to include (empty = all).
    pub schemas: Vec<String>,
    /// Tables to include (empty = all).
    pub tables: Vec<String>,
}

/// The host's model-building step.
#[async_trait]
pub trait ModelFactory<C: ?Sized + Sync>: Send + Sync {
    async fn create(&self, connection: &C, options: &ModelFactoryOptions) -> Result<DatabaseModel>;
}

/// Options the host passes to its code generator.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Name of the generated context class.
    pub context_name: String,
    /// Connection string the host embeds in the generated context, if any.
    pub connection_string: Option<String>,
}

/// A single generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub code: String,
}

/// Output of the host's code generator.
#[derive(Debug, Clone)]
pub struct ScaffoldedModel {
    /// The context file holding the connection configuration method.
    pub context_file: GeneratedFile,
    /// One file per entity.
    pub entity_files: Vec<GeneratedFile>,
}

/// The host's code-emission step.
pub trait CodeGenerator: Send + Sync {
    fn generate(
        &self,
        model: &DatabaseModel,
        options: &GenerationOptions,
    ) -> Result<ScaffoldedModel>;
}
