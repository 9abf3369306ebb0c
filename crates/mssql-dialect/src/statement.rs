//! Statement clause model at the host-framework boundary.
//!
//! The host query builder owns clause registration and execution; this
//! module models the slice of a statement the dialect reads and rewrites:
//! projection, source table, ORDER BY, LIMIT/OFFSET, the appendable
//! condition list, and the append-ordered bound values. The legacy
//! pagination rewrite injects synthetic `row` predicates and their bound
//! values back into this model, never into any other statement.

use crate::identifier::{bind_placeholder, quote_ident};
use crate::value::SqlValue;

/// A single ORDER BY key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByColumn {
    /// Column name, quoted on render.
    pub column: String,
    /// Descending order when true.
    pub desc: bool,
}

/// ORDER BY key list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderBy {
    /// Ordering keys, applied in sequence.
    pub columns: Vec<OrderByColumn>,
}

impl OrderBy {
    /// Render the ordering expression without the `ORDER BY` keyword,
    /// e.g. `"age" DESC, "id"`.
    pub fn render_expr(&self) -> String {
        self.columns
            .iter()
            .map(|c| {
                if c.desc {
                    format!("{} DESC", quote_ident(&c.column))
                } else {
                    quote_ident(&c.column)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// LIMIT/OFFSET pagination request. Zero means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    /// Maximum number of rows to return; 0 = unlimited.
    pub limit: u64,
    /// Number of rows to skip; 0 = none.
    pub offset: u64,
}

/// A WHERE predicate with `?` markers for its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    sql: String,
    values: Vec<SqlValue>,
    injected: bool,
}

impl Condition {
    /// Create a condition from a template with one `?` per value.
    pub fn new(sql: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            values,
            injected: false,
        }
    }

    /// Create a condition injected by the pagination rewrite.
    ///
    /// Injected conditions are cleared at the start of each render so
    /// re-rendering a statement never accumulates duplicate bounds.
    pub(crate) fn injected(sql: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            values,
            injected: true,
        }
    }
}

/// The dialect's view of a statement under construction.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    /// Source table name.
    pub table: String,
    /// Projection column names; empty means `*`.
    pub selects: Vec<String>,
    /// Caller-supplied ordering, if any.
    pub order_by: Option<OrderBy>,
    /// Caller-supplied pagination, if any.
    pub limit: Option<Limit>,
    /// Primary-key column from the host's schema metadata, if known.
    pub primary_key: Option<String>,
    conditions: Vec<Condition>,
    vars: Vec<SqlValue>,
}

impl Statement {
    /// Create a statement over the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Set the projection column list.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selects = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append an ORDER BY key.
    pub fn order_by(mut self, column: impl Into<String>, desc: bool) -> Self {
        self.order_by
            .get_or_insert_with(OrderBy::default)
            .columns
            .push(OrderByColumn {
                column: column.into(),
                desc,
            });
        self
    }

    /// Set the row limit, keeping any existing offset.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit.get_or_insert_with(Limit::default).limit = limit;
        self
    }

    /// Set the row offset, keeping any existing limit.
    pub fn offset(mut self, offset: u64) -> Self {
        self.limit.get_or_insert_with(Limit::default).offset = offset;
        self
    }

    /// Set the primary-key column from the host's schema metadata.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Append a WHERE predicate with its bound values.
    pub fn filter(mut self, sql: impl Into<String>, values: Vec<SqlValue>) -> Self {
        self.add_condition(Condition::new(sql, values));
        self
    }

    /// Append a condition to the statement's clause collection.
    ///
    /// Used by the caller for its own predicates and by the legacy
    /// pagination rewrite for synthetic row-number bounds.
    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Values bound on this statement, in placeholder order.
    ///
    /// Populated during rendering; empty before the first render.
    pub fn vars(&self) -> &[SqlValue] {
        &self.vars
    }

    /// Bind a value and return its positional placeholder.
    ///
    /// The placeholder ordinal equals the number of values bound so far,
    /// so placeholders always number in strict append order.
    pub fn add_var(&mut self, value: SqlValue) -> String {
        self.vars.push(value);
        bind_placeholder(self.vars.len())
    }

    /// The projection expression: quoted column list, or `*`.
    pub fn projection(&self) -> String {
        if self.selects.is_empty() {
            "*".to_string()
        } else {
            self.selects
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Default SELECT rendering, shared by both strategies.
    pub(crate) fn render_default_select(&self) -> String {
        format!("SELECT {}", self.projection())
    }

    /// Default FROM rendering: the quoted source table.
    pub(crate) fn render_default_from(&self) -> String {
        format!("FROM {}", quote_ident(&self.table))
    }

    /// Default ORDER BY rendering, if the caller supplied one.
    pub(crate) fn render_default_order_by(&self) -> Option<String> {
        self.order_by
            .as_ref()
            .filter(|ob| !ob.columns.is_empty())
            .map(|ob| format!("ORDER BY {}", ob.render_expr()))
    }

    /// Render the WHERE clause, substituting `?` markers with positional
    /// placeholders and binding values in append order.
    ///
    /// Must run after any clause builder that injects conditions, so the
    /// injected bounds number after the caller's own values.
    pub(crate) fn render_where(&mut self) -> Option<String> {
        if self.conditions.is_empty() {
            return None;
        }
        let conditions = std::mem::take(&mut self.conditions);
        let rendered = conditions
            .iter()
            .map(|c| self.render_condition(c))
            .collect::<Vec<_>>()
            .join(" AND ");
        self.conditions = conditions;
        Some(format!("WHERE {rendered}"))
    }

    fn render_condition(&mut self, condition: &Condition) -> String {
        let mut out = String::with_capacity(condition.sql.len() + 8);
        let mut values = condition.values.iter();
        let mut parts = condition.sql.split('?');
        out.push_str(parts.next().unwrap_or_default());
        for part in parts {
            match values.next() {
                Some(value) => out.push_str(&self.add_var(value.clone())),
                // Marker without a value: leave it for the driver to reject.
                None => out.push('?'),
            }
            out.push_str(part);
        }
        out
    }

    /// Reset render state so the statement can be rendered again from
    /// scratch: clears the bound values and drops any conditions the
    /// pagination rewrite injected on a previous render. The caller's
    /// own conditions are kept.
    pub(crate) fn reset_render_state(&mut self) {
        self.vars.clear();
        self.conditions.retain(|c| !c.injected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_defaults_to_star() {
        let stmt = Statement::new("Users");
        assert_eq!(stmt.projection(), "*");
        assert_eq!(stmt.render_default_select(), "SELECT *");
    }

    #[test]
    fn test_projection_quotes_columns() {
        let stmt = Statement::new("Users").select(["Id", "Name"]);
        assert_eq!(stmt.projection(), "\"Id\", \"Name\"");
    }

    #[test]
    fn test_order_by_expr() {
        let stmt = Statement::new("Users").order_by("age", true).order_by("id", false);
        assert_eq!(
            stmt.order_by.as_ref().unwrap().render_expr(),
            "\"age\" DESC, \"id\""
        );
    }

    #[test]
    fn test_where_binds_in_append_order() {
        let mut stmt = Statement::new("Users")
            .filter("Active = ?", vec![SqlValue::Bool(true)])
            .filter("Age > ?", vec![SqlValue::Int(21)]);
        let where_sql = stmt.render_where().unwrap();
        assert_eq!(where_sql, "WHERE Active = @p1 AND Age > @p2");
        assert_eq!(
            stmt.vars(),
            &[SqlValue::Bool(true), SqlValue::Int(21)]
        );
    }

    #[test]
    fn test_where_empty_is_none() {
        let mut stmt = Statement::new("Users");
        assert!(stmt.render_where().is_none());
    }

    #[test]
    fn test_reset_render_state_drops_injected_conditions_only() {
        let mut stmt = Statement::new("Users").filter("A = ?", vec![SqlValue::Int(1)]);
        stmt.add_condition(Condition::injected("row > ?", vec![SqlValue::Uint(5)]));
        assert_eq!(stmt.render_where().unwrap(), "WHERE A = @p1 AND row > @p2");

        stmt.reset_render_state();
        assert_eq!(stmt.render_where().unwrap(), "WHERE A = @p1");
        assert_eq!(stmt.vars(), &[SqlValue::Int(1)]);
    }

    #[test]
    fn test_condition_with_missing_value_keeps_marker() {
        let mut stmt = Statement::new("Users").filter("A = ? AND B = ?", vec![SqlValue::Int(1)]);
        let where_sql = stmt.render_where().unwrap();
        assert_eq!(where_sql, "WHERE A = @p1 AND B = ?");
    }
}
