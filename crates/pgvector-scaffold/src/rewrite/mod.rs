//! Post-processing of the generated context source.
//!
//! When the model contains vector columns, the generated `OnConfiguring`
//! method must enable pgvector on the Npgsql provider:
//!
//! ```text
//! optionsBuilder.UseNpgsql("Host=db;Database=shop");
//!   becomes
//! optionsBuilder.UseNpgsql("Name=ConnectionStrings:DefaultConnection", o => o.UseVector());
//! ```
//!
//! The option is inserted before the parenthesis that closes the
//! `UseNpgsql(` call, found with a balanced-delimiter scan (see [`scan`]).

pub mod scan;

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::config::RewriteConfig;
use crate::error::{Result, ScaffoldError};

/// Call whose argument list receives the vector option.
pub const USE_NPGSQL_MARKER: &str = ".UseNpgsql(";

/// Option appended to the `UseNpgsql` argument list.
pub const USE_VECTOR_OPTION: &str = "o => o.UseVector()";

/// Presence of this anywhere in the text means the option is already there.
pub const USE_VECTOR_TOKEN: &str = "UseVector()";

/// Advisory emitted by the host generator above an inline connection string.
pub const CONNECTION_STRING_WARNING: &str = "#warning To protect potentially sensitive information in your connection string, you should move it out of source code. You can avoid scaffolding the connection string by using the Name= syntax to read it from configuration - see https://go.microsoft.com/fwlink/?linkid=2131148. For more guidance on storing connection strings, see https://go.microsoft.com/fwlink/?LinkId=723263.";

/// Rewrites generated context source for models with vector columns.
#[derive(Debug, Clone)]
pub struct SourceRewriter {
    connection_string: Option<String>,
    connection_indirection: String,
}

impl Default for SourceRewriter {
    fn default() -> Self {
        Self::new(&RewriteConfig::default())
    }
}

impl SourceRewriter {
    pub fn new(config: &RewriteConfig) -> Self {
        Self {
            connection_string: None,
            connection_indirection: config.connection_indirection(),
        }
    }

    /// Set the connection string the host inlined into the generated code.
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    /// Rewrite `text` if the model has vector types; otherwise return it unchanged.
    ///
    /// Malformed input (an unclosed `UseNpgsql(` call) is reported with a
    /// warning and returned unmodified.
    pub fn rewrite(&self, text: &str, has_vector_types: bool) -> String {
        if !has_vector_types {
            return text.to_string();
        }

        match self.try_rewrite(text) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                warn!("Leaving generated context unmodified: {}", e);
                text.to_string()
            }
        }
    }

    /// Apply the vector rewrite unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::UnbalancedDelimiters`] if the `UseNpgsql(`
    /// call is never closed.
    pub fn try_rewrite(&self, text: &str) -> Result<String> {
        let text = remove_lines_containing(text, CONNECTION_STRING_WARNING);
        let text = self.replace_connection_string(&text);
        insert_use_vector(&text)
    }

    fn replace_connection_string<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let Some(conn) = self.connection_string.as_deref() else {
            return Cow::Borrowed(text);
        };
        // A needle found in the replacement or the inserted option would make
        // the rewrite non-idempotent.
        if conn.is_empty()
            || self.connection_indirection.contains(conn)
            || USE_VECTOR_OPTION.contains(conn)
        {
            return Cow::Borrowed(text);
        }

        let escaped = escape_string_literal(conn);
        let mut result = Cow::Borrowed(text);
        for needle in [conn, escaped.as_str()] {
            if result.contains(needle) {
                debug!("Replacing inline connection string with configuration reference");
                result = Cow::Owned(result.replace(needle, &self.connection_indirection));
            }
        }
        result
    }
}

/// Insert the vector option into the first `UseNpgsql(` call.
fn insert_use_vector(text: &str) -> Result<String> {
    if text.contains(USE_VECTOR_TOKEN) {
        return Ok(text.to_string());
    }
    let Some(marker_at) = text.find(USE_NPGSQL_MARKER) else {
        debug!("No {} call in generated context", USE_NPGSQL_MARKER);
        return Ok(text.to_string());
    };

    let open = marker_at + USE_NPGSQL_MARKER.len() - 1;
    let close = scan::find_matching_close(text, open, b'(', b')').ok_or_else(|| {
        ScaffoldError::UnbalancedDelimiters {
            marker: USE_NPGSQL_MARKER.to_string(),
            offset: open,
        }
    })?;

    let fragment = if scan::is_blank(&text[open + 1..close]) {
        USE_VECTOR_OPTION.to_string()
    } else {
        format!(", {}", USE_VECTOR_OPTION)
    };

    let mut rewritten = String::with_capacity(text.len() + fragment.len());
    rewritten.push_str(&text[..close]);
    rewritten.push_str(&fragment);
    rewritten.push_str(&text[close..]);
    Ok(rewritten)
}

/// Drop every line containing `needle`, line terminator included.
fn remove_lines_containing<'a>(text: &'a str, needle: &str) -> Cow<'a, str> {
    if !text.contains(needle) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.split_inclusive('\n')
            .filter(|line| !line.contains(needle))
            .collect(),
    )
}

/// Escape a value the way it appears inside a regular C# string literal.
fn escape_string_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
