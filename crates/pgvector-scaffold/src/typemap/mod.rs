//! Type mapping from pgvector store types to generated-code types.
//!
//! [`VectorTypeMappingSource`] is plugged into the host's type resolution.
//! For store types it does not recognize it returns `None`, and the host
//! falls back to its default mapping.

use std::fmt;

use crate::core::traits::TypeMappingSource;
use crate::storetype::{self, VectorKind};

/// Semantic type assigned to a vector column in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `Pgvector.Vector`
    Vector,
    /// `Pgvector.HalfVector`
    HalfVector,
    /// `Pgvector.SparseVector`
    SparseVector,
}

impl TypeTag {
    /// Type name without namespace.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeTag::Vector => "Vector",
            TypeTag::HalfVector => "HalfVector",
            TypeTag::SparseVector => "SparseVector",
        }
    }

    /// Namespace the generated code imports the type from.
    pub fn namespace(&self) -> &'static str {
        "Pgvector"
    }

    /// Fully qualified type name, e.g. `Pgvector.Vector`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.type_name())
    }
}

impl From<VectorKind> for TypeTag {
    fn from(kind: VectorKind) -> Self {
        match kind {
            VectorKind::Vector => TypeTag::Vector,
            VectorKind::HalfVec => TypeTag::HalfVector,
            VectorKind::SparseVec => TypeTag::SparseVector,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Result of resolving a store type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// Canonical store type (e.g. "vector(1536)").
    pub store_type: String,
    /// Semantic type for generated code.
    pub semantic_type: TypeTag,
    /// Vector dimension, if declared.
    pub dimension: Option<u32>,
}

/// Resolves pgvector store types to [`TypeMapping`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorTypeMappingSource;

impl VectorTypeMappingSource {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a store type name. `None` means the type is not a vector type.
    pub fn resolve(&self, store_type: &str) -> Option<TypeMapping> {
        let desc = storetype::parse(store_type)?;
        Some(TypeMapping {
            store_type: desc.canonical(),
            semantic_type: TypeTag::from(desc.kind),
            dimension: desc.dimension,
        })
    }
}

impl TypeMappingSource for VectorTypeMappingSource {
    fn find_mapping(&self, store_type: &str) -> Option<TypeMapping> {
        self.resolve(store_type)
    }
}
