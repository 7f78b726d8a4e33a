//! Catalog enrichment of the host's database model.
//!
//! The host introspector loses information pgvector needs: the dimension of
//! `vector(n)` columns and the access method / operator class of vector
//! indexes. [`CatalogEnricher`] reads both from the PostgreSQL catalog and
//! attaches them as annotations, then flags the model if any column maps to a
//! vector type.
//!
//! Every query runs before the first annotation is written, so a failed pass
//! leaves the model as the host built it.

mod queries;

pub use queries::{COLUMN_STORE_TYPE_QUERY, VECTOR_INDEX_QUERY};

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument, trace};

use crate::config::EnrichmentConfig;
use crate::core::annotations::AnnotationKey;
use crate::core::schema::DatabaseModel;
use crate::core::traits::{CatalogClient, CatalogIndexRecord};
use crate::error::Result;
use crate::storetype;

/// Index access methods provided by pgvector.
pub const VECTOR_INDEX_METHODS: [&str; 2] = ["hnsw", "ivfflat"];

/// `LIKE` pattern matching pgvector operator classes
/// (`vector_l2_ops`, `halfvec_cosine_ops`, `sparsevec_ip_ops`, ...).
pub const VECTOR_OPERATOR_CLASS_PATTERN: &str = "%vec%_ops";

/// What an enrichment pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    /// Columns that received a store type annotation.
    pub column_types: usize,
    /// Index records matched to a model index.
    pub indexes_annotated: usize,
    /// Index records with no matching table or index in the model.
    pub unmatched_index_records: usize,
    /// Whether the model was flagged as containing vector types.
    pub has_vector_types: bool,
}

/// Attaches catalog metadata to a [`DatabaseModel`].
#[derive(Debug, Clone)]
pub struct CatalogEnricher {
    column_lookup_concurrency: usize,
}

impl Default for CatalogEnricher {
    fn default() -> Self {
        Self::new(&EnrichmentConfig::default())
    }
}

impl CatalogEnricher {
    /// Create an enricher from configuration.
    pub fn new(config: &EnrichmentConfig) -> Self {
        Self {
            column_lookup_concurrency: config.column_lookup_concurrency.max(1),
        }
    }

    /// Run the enrichment pass.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::CatalogQuery`](crate::ScaffoldError::CatalogQuery)
    /// if any catalog query fails. The model is not modified in that case.
    #[instrument(skip_all, fields(tables = model.tables.len()))]
    pub async fn enrich<C>(&self, model: &mut DatabaseModel, client: &C) -> Result<EnrichmentSummary>
    where
        C: CatalogClient + ?Sized,
    {
        let column_types = self.lookup_column_types(model, client).await?;
        let index_records = client
            .vector_indexes(&VECTOR_INDEX_METHODS, VECTOR_OPERATOR_CLASS_PATTERN)
            .await?;
        debug!(
            "Catalog returned {} column types and {} vector index records",
            column_types.len(),
            index_records.len()
        );

        let mut summary = EnrichmentSummary {
            column_types: column_types.len(),
            ..Default::default()
        };

        for ((table_idx, column_idx), store_type) in column_types {
            model.tables[table_idx].columns[column_idx]
                .annotations
                .set(AnnotationKey::StoreType, store_type);
        }

        for record in &index_records {
            if annotate_index(model, record) {
                summary.indexes_annotated += 1;
            } else {
                summary.unmatched_index_records += 1;
            }
        }

        summary.has_vector_types = self.flag_vector_types(model);

        info!(
            "Enriched model: {} column types, {} vector indexes ({} unmatched), vector types: {}",
            summary.column_types,
            summary.indexes_annotated,
            summary.unmatched_index_records,
            summary.has_vector_types
        );
        Ok(summary)
    }

    /// Look up the formatted type of every column.
    ///
    /// Returns `((table index, column index), store type)` for each column
    /// the catalog knows about.
    async fn lookup_column_types<C>(
        &self,
        model: &DatabaseModel,
        client: &C,
    ) -> Result<Vec<((usize, usize), String)>>
    where
        C: CatalogClient + ?Sized,
    {
        let mut positions = Vec::new();
        let mut lookups = Vec::new();
        for (table_idx, table) in model.tables.iter().enumerate() {
            for (column_idx, column) in table.columns.iter().enumerate() {
                positions.push((table_idx, column_idx));
                lookups.push(client.column_store_type(&table.schema, &table.name, &column.name));
            }
        }

        // `buffered` yields results in submission order, so they line up with `positions`.
        let store_types: Vec<Option<String>> = stream::iter(lookups)
            .buffered(self.column_lookup_concurrency)
            .try_collect()
            .await?;

        Ok(positions
            .into_iter()
            .zip(store_types)
            .filter_map(|(pos, store_type)| {
                store_type.map(|st| (pos, strip_schema_qualifier(&st).to_string()))
            })
            .collect())
    }

    /// Set the model-level flag if any column is a vector type, and clear
    /// a flag left by an earlier pass otherwise.
    fn flag_vector_types(&self, model: &mut DatabaseModel) -> bool {
        let has_vector_types = model.columns().any(|(_, column)| {
            column
                .effective_store_type()
                .is_some_and(|st| storetype::parse(st).is_some())
        });

        if has_vector_types {
            model
                .annotations
                .set(AnnotationKey::HasVectorTypes, true);
        } else {
            model.annotations.remove(AnnotationKey::HasVectorTypes);
        }
        has_vector_types
    }
}

/// Drop the schema `format_type` prepends when the type's schema is not on
/// the search path: `extensions.vector(3)` becomes `vector(3)`.
fn strip_schema_qualifier(formatted: &str) -> &str {
    let name_end = formatted.find('(').unwrap_or(formatted.len());
    let mut in_quotes = false;
    let mut last_dot = None;
    for (i, b) in formatted.as_bytes()[..name_end].iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'.' if !in_quotes => last_dot = Some(i),
            _ => {}
        }
    }
    match last_dot {
        Some(dot) => &formatted[dot + 1..],
        None => formatted,
    }
}

/// Attach method and operator class to the matching model index.
///
/// Returns `false` when the table or index is not in the model, which is
/// expected when the host filtered tables.
fn annotate_index(model: &mut DatabaseModel, record: &CatalogIndexRecord) -> bool {
    let Some(table) = model.find_table_mut(&record.schema, &record.table_name) else {
        trace!(
            "Skipping index {}: table {}.{} not in model",
            record.index_name,
            record.schema,
            record.table_name
        );
        return false;
    };

    let Some(index) = table.find_index_mut(&record.index_name) else {
        trace!(
            "Skipping index {}: not in model for {}.{}",
            record.index_name,
            record.schema,
            record.table_name
        );
        return false;
    };

    index
        .annotations
        .set(AnnotationKey::IndexMethod, record.method.as_str());
    index
        .annotations
        .set(AnnotationKey::IndexOperators, record.operator_class.as_str());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::core::schema::{DatabaseColumn, DatabaseIndex, DatabaseTable};
    use crate::error::{CatalogQuery, ScaffoldError};

    #[derive(Default)]
    struct FakeCatalog {
        column_types: HashMap<(String, String, String), String>,
        indexes: Vec<CatalogIndexRecord>,
        fail_columns: bool,
        fail_indexes: bool,
        column_calls: AtomicUsize,
        delays: HashMap<String, Duration>,
    }

    impl FakeCatalog {
        fn with_column_type(mut self, schema: &str, table: &str, column: &str, ty: &str) -> Self {
            self.column_types.insert(
                (schema.to_string(), table.to_string(), column.to_string()),
                ty.to_string(),
            );
            self
        }

        fn with_delay(mut self, column: &str, delay: Duration) -> Self {
            self.delays.insert(column.to_string(), delay);
            self
        }

        fn with_index(mut self, schema: &str, table: &str, index: &str, method: &str, opclass: &str) -> Self {
            self.indexes.push(CatalogIndexRecord {
                schema: schema.to_string(),
                table_name: table.to_string(),
                index_name: index.to_string(),
                method: method.to_string(),
                operator_class: opclass.to_string(),
            });
            self
        }
    }

    #[async_trait]
    impl CatalogClient for FakeCatalog {
        async fn column_store_type(
            &self,
            schema: &str,
            table: &str,
            column: &str,
        ) -> Result<Option<String>> {
            self.column_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(column) {
                tokio::time::sleep(*delay).await;
            }
            if self.fail_columns {
                return Err(ScaffoldError::catalog(
                    CatalogQuery::ColumnStoreType,
                    "connection reset by peer",
                ));
            }
            Ok(self
                .column_types
                .get(&(schema.to_string(), table.to_string(), column.to_string()))
                .cloned())
        }

        async fn vector_indexes(
            &self,
            access_methods: &[&str],
            operator_class_pattern: &str,
        ) -> Result<Vec<CatalogIndexRecord>> {
            assert_eq!(access_methods, &["hnsw", "ivfflat"]);
            assert_eq!(operator_class_pattern, "%vec%_ops");
            if self.fail_indexes {
                return Err(ScaffoldError::catalog(
                    CatalogQuery::VectorIndexes,
                    "permission denied for table pg_opclass",
                ));
            }
            Ok(self.indexes.clone())
        }
    }

    fn products_model() -> DatabaseModel {
        DatabaseModel::new(vec![DatabaseTable::new("public", "products")
            .with_column(DatabaseColumn::new("id", Some("integer")))
            .with_column(DatabaseColumn::new("embedding", None))
            .with_index(DatabaseIndex::new("ix_products_embedding", &["embedding"]))])
    }

    #[tokio::test]
    async fn test_index_record_annotates_matching_index() {
        let catalog = FakeCatalog::default().with_index(
            "public",
            "products",
            "ix_products_embedding",
            "hnsw",
            "vector_cosine_ops",
        );
        let mut model = products_model();

        let summary = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap();

        let index = &model.tables[0].indexes[0];
        assert_eq!(index.method(), Some("hnsw"));
        assert_eq!(index.operator_class(), Some("vector_cosine_ops"));
        assert_eq!(summary.indexes_annotated, 1);
        assert_eq!(summary.unmatched_index_records, 0);
    }

    #[tokio::test]
    async fn test_column_store_types_and_model_flag() {
        let catalog = FakeCatalog::default()
            .with_column_type("public", "products", "id", "integer")
            .with_column_type("public", "products", "embedding", "vector(1536)");
        let mut model = products_model();

        let summary = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap();

        let columns = &model.tables[0].columns;
        assert_eq!(columns[0].effective_store_type(), Some("integer"));
        assert_eq!(columns[1].effective_store_type(), Some("vector(1536)"));
        assert_eq!(summary.column_types, 2);
        assert!(summary.has_vector_types);
        assert!(model.has_vector_types());
        assert_eq!(catalog.column_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_vector_columns_leaves_flag_unset() {
        let catalog = FakeCatalog::default().with_column_type("public", "products", "id", "integer");
        let mut model = products_model();

        let summary = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap();

        assert!(!summary.has_vector_types);
        assert!(!model.annotations.contains(AnnotationKey::HasVectorTypes));
    }

    #[tokio::test]
    async fn test_host_store_type_alone_sets_flag() {
        let catalog = FakeCatalog::default();
        let mut model = DatabaseModel::new(vec![DatabaseTable::new("public", "docs")
            .with_column(DatabaseColumn::new("sparse", Some("sparsevec")))]);

        let summary = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap();

        assert_eq!(summary.column_types, 0);
        assert!(model.has_vector_types());
    }

    #[tokio::test]
    async fn test_unmatched_index_records_are_skipped() {
        let catalog = FakeCatalog::default()
            .with_index("public", "archived", "ix_archived_vec", "ivfflat", "vector_l2_ops")
            .with_index("public", "products", "ix_gone", "hnsw", "halfvec_l2_ops")
            .with_index("other", "products", "ix_products_embedding", "hnsw", "vector_ip_ops");
        let mut model = products_model();

        let summary = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap();

        assert_eq!(summary.unmatched_index_records, 3);
        assert_eq!(summary.indexes_annotated, 0);
        assert!(model.tables[0].indexes[0].annotations.is_empty());
    }

    #[tokio::test]
    async fn test_column_query_failure_leaves_model_untouched() {
        let catalog = FakeCatalog {
            fail_columns: true,
            ..Default::default()
        }
        .with_index("public", "products", "ix_products_embedding", "hnsw", "vector_l2_ops");
        let mut model = products_model();

        let err = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScaffoldError::CatalogQuery {
                query: CatalogQuery::ColumnStoreType,
                ..
            }
        ));
        assert!(model.annotations.is_empty());
        assert!(model.tables[0].indexes[0].annotations.is_empty());
    }

    #[tokio::test]
    async fn test_index_query_failure_leaves_model_untouched() {
        let catalog = FakeCatalog {
            fail_indexes: true,
            ..Default::default()
        }
        .with_column_type("public", "products", "embedding", "vector(3)");
        let mut model = products_model();

        let err = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("vector index metadata"));
        assert!(model.tables[0].columns[1].annotations.is_empty());
        assert!(!model.has_vector_types());
    }

    #[tokio::test]
    async fn test_serial_lookups_with_concurrency_one() {
        let catalog = FakeCatalog::default()
            .with_column_type("public", "products", "embedding", "halfvec(8)");
        let mut model = products_model();
        let enricher = CatalogEnricher::new(&EnrichmentConfig {
            column_lookup_concurrency: 1,
        });

        enricher.enrich(&mut model, &catalog).await.unwrap();

        assert_eq!(
            model.tables[0].columns[1].effective_store_type(),
            Some("halfvec(8)")
        );
    }

    #[tokio::test]
    async fn test_out_of_order_lookups_land_on_their_columns() {
        let catalog = FakeCatalog::default()
            .with_column_type("public", "items", "a", "vector(1)")
            .with_column_type("public", "items", "bb", "halfvec(2)")
            .with_delay("a", Duration::from_millis(50));
        let mut model = DatabaseModel::new(vec![DatabaseTable::new("public", "items")
            .with_column(DatabaseColumn::new("a", Some("vector")))
            .with_column(DatabaseColumn::new("bb", Some("halfvec")))]);

        CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap();

        let columns = &model.tables[0].columns;
        assert_eq!(columns[0].effective_store_type(), Some("vector(1)"));
        assert_eq!(columns[1].effective_store_type(), Some("halfvec(2)"));
    }

    #[tokio::test]
    async fn test_schema_qualified_catalog_type() {
        let catalog = FakeCatalog::default()
            .with_column_type("public", "products", "embedding", "extensions.vector(3)");
        let mut model = DatabaseModel::new(vec![DatabaseTable::new("public", "products")
            .with_column(DatabaseColumn::new("embedding", Some("vector")))]);

        let summary = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap();

        assert_eq!(
            model.tables[0].columns[0].effective_store_type(),
            Some("vector(3)")
        );
        assert!(summary.has_vector_types);
        assert!(model.has_vector_types());
    }

    #[test]
    fn test_strip_schema_qualifier() {
        assert_eq!(strip_schema_qualifier("vector(3)"), "vector(3)");
        assert_eq!(strip_schema_qualifier("extensions.halfvec(8)"), "halfvec(8)");
        assert_eq!(strip_schema_qualifier("\"my.ext\".sparsevec"), "sparsevec");
        assert_eq!(strip_schema_qualifier("numeric(10,2)"), "numeric(10,2)");
        assert_eq!(strip_schema_qualifier("integer"), "integer");
    }

    #[tokio::test]
    async fn test_stale_flag_is_cleared() {
        let catalog = FakeCatalog::default().with_column_type("public", "products", "id", "integer");
        let mut model = products_model();
        model.annotations.set(AnnotationKey::HasVectorTypes, true);

        let summary = CatalogEnricher::default()
            .enrich(&mut model, &catalog)
            .await
            .unwrap();

        assert!(!summary.has_vector_types);
        assert!(!model.has_vector_types());
    }
}
