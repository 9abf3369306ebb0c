//! Diagnostics formatter.
//!
//! Substitutes `@p<n>` placeholders with their bound values rendered as
//! SQL literals, producing a human-readable query string for logging.
//! Purely cosmetic and best effort: out-of-range or malformed
//! placeholders are left untouched, and nothing here ever fails.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::value::SqlValue;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@p(\d+)").expect("placeholder pattern is valid"));

/// Render a SQL string with placeholders replaced by literal values.
///
/// Boolean values normalize to the integer literals `0`/`1` (T-SQL has
/// no boolean literal) and strings are single-quoted.
pub fn explain(sql: &str, vars: &[SqlValue]) -> String {
    PLACEHOLDER
        .replace_all(sql, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|ordinal| ordinal.checked_sub(1))
                .and_then(|idx| vars.get(idx))
                .map(SqlValue::to_literal)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
