//! Parser for pgvector store type declarations.
//!
//! Recognizes `vector`, `halfvec` and `sparsevec`, each with an optional
//! parenthesized dimension: `vector(1536)`, `HALFVEC`, ` sparsevec(0) `.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// `[0-9]` rather than `\d`: the latter matches non-ASCII digits.
static STORE_TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(vector|halfvec|sparsevec)(?:\(([0-9]+)\))?$")
        .expect("store type pattern is valid")
});

/// Base kind of a pgvector store type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    /// Dense single-precision vector (`vector`).
    Vector,
    /// Dense half-precision vector (`halfvec`).
    HalfVec,
    /// Sparse vector (`sparsevec`).
    SparseVec,
}

impl VectorKind {
    /// Store type name as PostgreSQL spells it.
    pub fn store_name(&self) -> &'static str {
        match self {
            VectorKind::Vector => "vector",
            VectorKind::HalfVec => "halfvec",
            VectorKind::SparseVec => "sparsevec",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        if prefix.eq_ignore_ascii_case("vector") {
            Some(VectorKind::Vector)
        } else if prefix.eq_ignore_ascii_case("halfvec") {
            Some(VectorKind::HalfVec)
        } else if prefix.eq_ignore_ascii_case("sparsevec") {
            Some(VectorKind::SparseVec)
        } else {
            None
        }
    }
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.store_name())
    }
}

/// A parsed store type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTypeDescriptor {
    /// The input text, untrimmed.
    pub raw: String,
    /// Base kind from the type name prefix.
    pub kind: VectorKind,
    /// Dimension, present exactly when the input had a `(n)` suffix.
    pub dimension: Option<u32>,
}

impl StoreTypeDescriptor {
    /// Canonical lowercase rendering, e.g. `vector(1536)` or `sparsevec`.
    pub fn canonical(&self) -> String {
        match self.dimension {
            Some(dim) => format!("{}({})", self.kind.store_name(), dim),
            None => self.kind.store_name().to_string(),
        }
    }
}

/// Parse a store type string.
///
/// Returns `None` for anything outside the grammar, including negative,
/// non-numeric or out-of-range dimensions. A zero dimension is accepted.
pub fn parse(raw: &str) -> Option<StoreTypeDescriptor> {
    let caps = STORE_TYPE_PATTERN.captures(raw.trim())?;
    let kind = VectorKind::from_prefix(caps.get(1)?.as_str())?;
    let dimension = match caps.get(2) {
        Some(m) => Some(m.as_str().parse::<u32>().ok()?),
        None => None,
    };

    Some(StoreTypeDescriptor {
        raw: raw.to_string(),
        kind,
        dimension,
    })
}
