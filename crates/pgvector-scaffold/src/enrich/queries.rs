//! PostgreSQL catalog queries and the `tokio_postgres` client binding.

use async_trait::async_trait;
use tokio_postgres::Row;

use crate::core::traits::{CatalogClient, CatalogIndexRecord};
use crate::error::{CatalogQuery, Result, ScaffoldError};

/// Formatted type of one column, type modifiers included (`vector(1536)`).
pub const COLUMN_STORE_TYPE_QUERY: &str = r#"
    SELECT format_type(a.atttypid, a.atttypmod)
    FROM pg_catalog.pg_attribute a
    JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    WHERE n.nspname = $1
      AND c.relname = $2
      AND a.attname = $3
      AND a.attnum > 0
      AND NOT a.attisdropped
"#;

/// Indexes built with one of the access methods in `$1` whose operator
/// class matches the `LIKE` pattern `$2`.
pub const VECTOR_INDEX_QUERY: &str = r#"
    SELECT DISTINCT
        n.nspname AS schema_name,
        t.relname AS table_name,
        i.relname AS index_name,
        am.amname AS method,
        opc.opcname AS operator_class
    FROM pg_catalog.pg_index ix
    JOIN pg_catalog.pg_class i ON i.oid = ix.indexrelid
    JOIN pg_catalog.pg_class t ON t.oid = ix.indrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_catalog.pg_am am ON am.oid = i.relam
    JOIN pg_catalog.pg_opclass opc ON opc.oid = ANY(ix.indclass)
    WHERE am.amname = ANY($1)
      AND opc.opcname LIKE $2
    ORDER BY schema_name, table_name, index_name
"#;

fn index_record(row: &Row) -> std::result::Result<CatalogIndexRecord, tokio_postgres::Error> {
    Ok(CatalogIndexRecord {
        schema: row.try_get(0)?,
        table_name: row.try_get(1)?,
        index_name: row.try_get(2)?,
        method: row.try_get(3)?,
        operator_class: row.try_get(4)?,
    })
}

#[async_trait]
impl CatalogClient for tokio_postgres::Client {
    async fn column_store_type(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Option<String>> {
        let row = self
            .query_opt(COLUMN_STORE_TYPE_QUERY, &[&schema, &table, &column])
            .await
            .map_err(|e| ScaffoldError::catalog(CatalogQuery::ColumnStoreType, e))?;

        match row {
            Some(row) => row
                .try_get::<_, Option<String>>(0)
                .map_err(|e| ScaffoldError::catalog(CatalogQuery::ColumnStoreType, e)),
            None => Ok(None),
        }
    }

    async fn vector_indexes(
        &self,
        access_methods: &[&str],
        operator_class_pattern: &str,
    ) -> Result<Vec<CatalogIndexRecord>> {
        let rows = self
            .query(VECTOR_INDEX_QUERY, &[&access_methods, &operator_class_pattern])
            .await
            .map_err(|e| ScaffoldError::catalog(CatalogQuery::VectorIndexes, e))?;

        rows.iter()
            .map(|row| {
                index_record(row).map_err(|e| ScaffoldError::catalog(CatalogQuery::VectorIndexes, e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_query_is_keyed_by_schema_table_column() {
        assert!(COLUMN_STORE_TYPE_QUERY.contains("n.nspname = $1"));
        assert!(COLUMN_STORE_TYPE_QUERY.contains("c.relname = $2"));
        assert!(COLUMN_STORE_TYPE_QUERY.contains("a.attname = $3"));
        assert!(COLUMN_STORE_TYPE_QUERY.contains("format_type(a.atttypid, a.atttypmod)"));
    }

    #[test]
    fn test_index_query_joins_required_catalogs() {
        for catalog in ["pg_index", "pg_class", "pg_namespace", "pg_am", "pg_opclass"] {
            assert!(
                VECTOR_INDEX_QUERY.contains(&format!("pg_catalog.{} ", catalog)),
                "missing join on {}",
                catalog
            );
        }
        assert!(VECTOR_INDEX_QUERY.contains("am.amname = ANY($1)"));
        assert!(VECTOR_INDEX_QUERY.contains("opc.opcname LIKE $2"));
    }

    #[test]
    fn test_queries_are_read_only() {
        for query in [COLUMN_STORE_TYPE_QUERY, VECTOR_INDEX_QUERY] {
            assert!(query.trim_start().starts_with("SELECT"));
            assert!(!query.contains(';'));
        }
    }
}
