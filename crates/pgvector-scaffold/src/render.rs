//! Fluent configuration fragments derived from enrichment annotations.
//!
//! Host generators append these to the entity configuration they emit, e.g.
//!
//! ```text
//! entity.HasIndex(e => e.Embedding, "ix_items_embedding")
//!     .HasMethod("hnsw")
//!     .HasOperators("vector_cosine_ops");
//! entity.Property(e => e.Embedding).HasColumnType("vector(1536)");
//! ```

use crate::core::schema::{DatabaseColumn, DatabaseIndex};
use crate::core::traits::TypeMappingSource;
use crate::typemap::TypeMapping;

/// `.HasMethod(..)` / `.HasOperators(..)` for an annotated vector index.
pub fn index_fragment(index: &DatabaseIndex) -> Option<String> {
    let method = index.method()?;
    let mut fragment = format!(".HasMethod({})", quote(method));
    if let Some(opclass) = index.operator_class() {
        fragment.push_str(&format!(".HasOperators({})", quote(opclass)));
    }
    Some(fragment)
}

/// `.HasColumnType(..)` for a column that maps to a vector type.
pub fn column_type_fragment(
    column: &DatabaseColumn,
    source: &dyn TypeMappingSource,
) -> Option<String> {
    let mapping = source.find_mapping(column.effective_store_type()?)?;
    Some(format!(".HasColumnType({})", quote(&mapping.store_type)))
}

/// Property type for a mapped column, e.g. `Pgvector.Vector?`.
pub fn property_type(mapping: &TypeMapping, is_nullable: bool) -> String {
    let mut ty = mapping.semantic_type.qualified_name();
    if is_nullable {
        ty.push('?');
    }
    ty
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
