//! Database model types handed over by the host scaffolding pipeline.
//!
//! The host's introspector builds these; this crate only attaches
//! annotations to them and reads them back during generation.

use serde::{Deserialize, Serialize};

use super::annotations::{AnnotationKey, Annotations};

/// Root of the reverse-engineered database model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseModel {
    /// Model-level annotations.
    #[serde(default)]
    pub annotations: Annotations,

    /// Tables discovered by the host introspector.
    pub tables: Vec<DatabaseTable>,
}

impl DatabaseModel {
    /// Create a model from a list of tables.
    pub fn new(tables: Vec<DatabaseTable>) -> Self {
        Self {
            annotations: Annotations::new(),
            tables,
        }
    }

    /// Find a table by schema and name (exact match, as reported by the catalog).
    pub fn find_table(&self, schema: &str, name: &str) -> Option<&DatabaseTable> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == name)
    }

    /// Find a table by schema and name for mutation.
    pub fn find_table_mut(&mut self, schema: &str, name: &str) -> Option<&mut DatabaseTable> {
        self.tables
            .iter_mut()
            .find(|t| t.schema == schema && t.name == name)
    }

    /// Iterate every column of every table.
    pub fn columns(&self) -> impl Iterator<Item = (&DatabaseTable, &DatabaseColumn)> {
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter().map(move |c| (t, c)))
    }

    /// Whether the enrichment pass flagged vector-typed columns.
    pub fn has_vector_types(&self) -> bool {
        self.annotations
            .get_flag(AnnotationKey::HasVectorTypes)
            .unwrap_or(false)
    }
}

/// Table metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseTable {
    /// Schema name.
    pub schema: String,

    /// Table name.
    pub name: String,

    /// Column definitions.
    pub columns: Vec<DatabaseColumn>,

    /// Indexes (excluding the primary key).
    #[serde(default)]
    pub indexes: Vec<DatabaseIndex>,

    #[serde(default)]
    pub annotations: Annotations,
}

impl DatabaseTable {
    /// Create a table with no columns or indexes.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    /// Get the fully qualified table name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn with_column(mut self, column: DatabaseColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: DatabaseIndex) -> Self {
        self.indexes.push(index);
        self
    }

    /// Find an index by name.
    pub fn find_index_mut(&mut self, name: &str) -> Option<&mut DatabaseIndex> {
        self.indexes.iter_mut().find(|i| i.name == name)
    }
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseColumn {
    /// Column name.
    pub name: String,

    /// Store type as seen by the host introspector. `None` when the host
    /// could not classify the type.
    pub store_type: Option<String>,

    /// Whether the column allows NULL.
    pub is_nullable: bool,

    #[serde(default)]
    pub annotations: Annotations,
}

impl DatabaseColumn {
    pub fn new(name: impl Into<String>, store_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            store_type: store_type.map(str::to_string),
            is_nullable: true,
            annotations: Annotations::new(),
        }
    }

    /// Store type to use during generation.
    ///
    /// The catalog-provided override wins over the host's own store type,
    /// which may have lost type modifiers such as the vector dimension.
    pub fn effective_store_type(&self) -> Option<&str> {
        self.annotations
            .get_str(AnnotationKey::StoreType)
            .or(self.store_type.as_deref())
    }
}

/// Index metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseIndex {
    /// Index name.
    pub name: String,

    /// Indexed column names.
    pub columns: Vec<String>,

    /// Whether the index is unique.
    pub is_unique: bool,

    #[serde(default)]
    pub annotations: Annotations,
}

impl DatabaseIndex {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            is_unique: false,
            annotations: Annotations::new(),
        }
    }

    pub fn method(&self) -> Option<&str> {
        self.annotations.get_str(AnnotationKey::IndexMethod)
    }

    pub fn operator_class(&self) -> Option<&str> {
        self.annotations.get_str(AnnotationKey::IndexOperators)
    }
}
