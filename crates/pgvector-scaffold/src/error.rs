//! Error types for the scaffolding extension.

use std::fmt;

use thiserror::Error;

/// Catalog query categories, used to name the failing query in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Per-column `format_type` lookup.
    ColumnStoreType,
    /// Index access method / operator class lookup.
    VectorIndexes,
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogQuery::ColumnStoreType => write!(f, "column store type lookup"),
            CatalogQuery::VectorIndexes => write!(f, "vector index metadata"),
        }
    }
}

/// Main error type for scaffolding extension operations.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Configuration error (invalid YAML, out-of-range values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A catalog query failed; the enrichment pass is abandoned.
    #[error("Catalog query failed ({query}): {message}")]
    CatalogQuery { query: CatalogQuery, message: String },

    /// Balanced-delimiter scan never found the closing delimiter.
    #[error("Unbalanced delimiters after '{marker}' starting at byte {offset}")]
    UnbalancedDelimiters { marker: String, offset: usize },

    /// The host code generator failed.
    #[error("Code generation failed: {0}")]
    Generation(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ScaffoldError {
    /// Create a CatalogQuery error for the given query category.
    pub fn catalog(query: CatalogQuery, message: impl fmt::Display) -> Self {
        ScaffoldError::CatalogQuery {
            query,
            message: message.to_string(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for scaffolding extension operations.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
