//! Key/value annotations attached to schema model nodes.
//!
//! Annotations carry catalog metadata from the enrichment pass to type
//! mapping and code generation. Keys come from a closed vocabulary; each
//! node holds at most one value per key and later writes replace earlier ones.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Annotation keys understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnnotationKey {
    /// Fully parameterized store type of a column (e.g. `vector(1536)`).
    #[serde(rename = "Relational:ColumnType")]
    StoreType,
    /// Index access method (e.g. `hnsw`).
    #[serde(rename = "Npgsql:IndexMethod")]
    IndexMethod,
    /// Index operator class (e.g. `vector_cosine_ops`).
    #[serde(rename = "Npgsql:IndexOperators")]
    IndexOperators,
    /// Model-level flag: at least one column maps to a vector type.
    #[serde(rename = "Pgvector:HasVectorTypes")]
    HasVectorTypes,
}

impl AnnotationKey {
    /// Get the annotation name as emitted into generated code.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKey::StoreType => "Relational:ColumnType",
            AnnotationKey::IndexMethod => "Npgsql:IndexMethod",
            AnnotationKey::IndexOperators => "Npgsql:IndexOperators",
            AnnotationKey::HasVectorTypes => "Pgvector:HasVectorTypes",
        }
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annotation value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// Text value (store types, method and operator class names).
    Text(String),
    /// Boolean flag.
    Flag(bool),
}

impl From<String> for AnnotationValue {
    fn from(v: String) -> Self {
        AnnotationValue::Text(v)
    }
}

impl From<&str> for AnnotationValue {
    fn from(v: &str) -> Self {
        AnnotationValue::Text(v.to_string())
    }
}

impl From<bool> for AnnotationValue {
    fn from(v: bool) -> Self {
        AnnotationValue::Flag(v)
    }
}

/// Annotations on a single model node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations {
    entries: BTreeMap<AnnotationKey, AnnotationValue>,
}

impl Annotations {
    /// Create an empty annotation set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an annotation, returning the value it replaced.
    pub fn set(
        &mut self,
        key: AnnotationKey,
        value: impl Into<AnnotationValue>,
    ) -> Option<AnnotationValue> {
        self.entries.insert(key, value.into())
    }

    pub fn get(&self, key: AnnotationKey) -> Option<&AnnotationValue> {
        self.entries.get(&key)
    }

    /// Get a text annotation. Flags are not coerced.
    pub fn get_str(&self, key: AnnotationKey) -> Option<&str> {
        match self.entries.get(&key) {
            Some(AnnotationValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get a flag annotation. Text values are not coerced.
    pub fn get_flag(&self, key: AnnotationKey) -> Option<bool> {
        match self.entries.get(&key) {
            Some(AnnotationValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn contains(&self, key: AnnotationKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn remove(&mut self, key: AnnotationKey) -> Option<AnnotationValue> {
        self.entries.remove(&key)
    }

    /// Iterate annotations in key order.
    pub fn iter(&self) -> impl Iterator<Item = (AnnotationKey, &AnnotationValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
