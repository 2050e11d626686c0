//! Table identifier validation.
//!
//! Table names are embedded verbatim in the generated statement, so they are
//! checked before use. Each `.`-separated segment must match
//! `[A-Za-z_][A-Za-z0-9_$]*`.
//!
//! Field names never need this: they are always back-tick quoted by the
//! [`SqlFormatter`](crate::format::SqlFormatter).

use crate::error::{BuildError, BuildResult};

/// Validate a (possibly schema-qualified) table name.
pub fn validate_table(name: &str) -> BuildResult<&str> {
    if name.is_empty() {
        return Err(BuildError::invalid_identifier("table name cannot be empty"));
    }

    for segment in name.split('.') {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else {
            return Err(BuildError::invalid_identifier(format!(
                "empty segment in table name '{name}'"
            )));
        };
        if !(first == '_' || first.is_ascii_alphabetic()) {
            return Err(BuildError::invalid_identifier(format!(
                "invalid start character '{first}' in table name '{name}'"
            )));
        }
        if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
            return Err(BuildError::invalid_identifier(format!(
                "invalid character '{c}' in table name '{name}'"
            )));
        }
    }

    Ok(name)
}
