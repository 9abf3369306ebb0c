//! Bound-parameter values.
//!
//! Values are bound positionally on a statement and referenced from the
//! SQL text via `@p<n>` placeholders. The literal rendering here exists
//! only for the explain/diagnostics formatter; execution always goes
//! through real bind parameters on the driver side.

/// A value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL.
    Null,
    /// Boolean value. T-SQL has no boolean literal; renders as `0`/`1`.
    Bool(bool),
    /// 64-bit signed integer (covers smallint/int/bigint bindings).
    Int(i64),
    /// Unsigned integer, used for injected pagination bounds.
    Uint(u64),
    /// 64-bit floating point.
    Float(f64),
    /// Text data.
    Text(String),
}

impl SqlValue {
    /// Render the value as a SQL literal for diagnostics output.
    ///
    /// Booleans normalize to the integers `0`/`1` and strings are quoted
    /// with embedded quotes doubled. Best effort only; never fails.
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(b) => i64::from(*b).to_string(),
            SqlValue::Int(v) => v.to_string(),
            SqlValue::Uint(v) => v.to_string(),
            SqlValue::Float(v) => v.to_string(),
            SqlValue::Text(v) => format!("'{}'", v.replace('\'', "''")),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<u64> for SqlValue {
    fn from(v: u64) -> Self {
        SqlValue::Uint(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}
