//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Catalog enrichment behavior.
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Generated source rewriting behavior.
    #[serde(default)]
    pub rewrite: RewriteConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog enrichment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Maximum in-flight per-column store type lookups (default: 8).
    #[serde(default = "default_column_lookup_concurrency")]
    pub column_lookup_concurrency: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            column_lookup_concurrency: default_column_lookup_concurrency(),
        }
    }
}

/// Source rewriting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Configuration key the inline connection string is replaced with,
    /// as in `Name=ConnectionStrings:<connection_name>` (default: "DefaultConnection").
    #[serde(default = "default_connection_name")]
    pub connection_name: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            connection_name: default_connection_name(),
        }
    }
}

impl RewriteConfig {
    /// The connection string indirection written into generated code.
    pub fn connection_indirection(&self) -> String {
        format!("Name=ConnectionStrings:{}", self.connection_name)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log verbosity: trace, debug, info, warn, error (default: "info").
    #[serde(default = "default_verbosity")]
    pub verbosity: String,

    /// Log format: text or json (default: "text").
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbosity: default_verbosity(),
            format: default_log_format(),
        }
    }
}

fn default_column_lookup_concurrency() -> usize {
    8
}

fn default_connection_name() -> String {
    "DefaultConnection".to_string()
}

fn default_verbosity() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}
