//! Configuration validation.

use super::ScaffoldConfig;
use crate::error::{Result, ScaffoldError};

const VERBOSITY_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Validate the configuration.
pub fn validate(config: &ScaffoldConfig) -> Result<()> {
    if config.enrichment.column_lookup_concurrency == 0 {
        return Err(ScaffoldError::Config(
            "enrichment.column_lookup_concurrency must be at least 1".into(),
        ));
    }

    let name = &config.rewrite.connection_name;
    if name.is_empty() {
        return Err(ScaffoldError::Config(
            "rewrite.connection_name is required".into(),
        ));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '\\')
    {
        return Err(ScaffoldError::Config(format!(
            "rewrite.connection_name must not contain whitespace, quotes or backslashes, got '{}'",
            name
        )));
    }

    let verbosity = config.logging.verbosity.to_lowercase();
    if !VERBOSITY_LEVELS.contains(&verbosity.as_str()) {
        return Err(ScaffoldError::Config(format!(
            "logging.verbosity must be one of {}, got '{}'",
            VERBOSITY_LEVELS.join(", "),
            config.logging.verbosity
        )));
    }

    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        return Err(ScaffoldError::Config(format!(
            "logging.format must be 'text' or 'json', got '{}'",
            config.logging.format
        )));
    }

    Ok(())
}
