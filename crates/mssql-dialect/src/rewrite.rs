//! Clause rewriting strategies.
//!
//! A [`RewriteStrategy`] is selected once per connection from the
//! server's [`CapabilityTier`] and rewrites the SELECT, FROM, ORDER BY,
//! and LIMIT clauses of every statement built on that connection:
//!
//! - **Modern** (2012+/Azure): only LIMIT is overridden, emitting native
//!   `OFFSET ... ROWS FETCH NEXT ... ROWS ONLY` syntax. The syntax
//!   requires an ORDER BY, so one is synthesized from the primary key
//!   (or `(SELECT NULL)`) when the caller supplied none.
//! - **Legacy** (pre-2012 on-premise): there is no standalone pagination
//!   syntax. Offsets restructure the statement into a `ROW_NUMBER()`
//!   subquery with the caller's ordering relocated inside it, filtered
//!   by injected `row` range predicates; offset-free limits become a
//!   `TOP(n)` cap on the SELECT clause.
//!
//! The four clause builders of the legacy strategy must agree on shared
//! derived state, so it is computed exactly once per statement as a
//! [`PaginationPlan`] and consumed by each builder.

use crate::identifier::quote_ident;
use crate::server::CapabilityTier;
use crate::statement::{Condition, Statement};

/// Per-statement pagination decisions, computed once and shared by all
/// clause builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationPlan {
    /// `TOP(n)` cap on the SELECT clause (legacy, offset-free limit).
    pub top: Option<u64>,
    /// Whether the FROM clause wraps the source in a row-numbered
    /// subquery (legacy, offset > 0).
    pub needs_subquery: bool,
    /// Injected lower bound: `row > n` (exclusive).
    pub lower_bound: Option<u64>,
    /// Injected upper bound: `row <= n` (inclusive, `limit + offset`).
    pub upper_bound: Option<u64>,
}

impl PaginationPlan {
    /// Derive the plan from the statement's LIMIT clause.
    ///
    /// No LIMIT clause, or one with both counts zero, yields the empty
    /// plan: the statement renders as an unpaginated query.
    pub fn for_statement(stmt: &Statement) -> Self {
        let Some(limit) = stmt.limit else {
            return Self::default();
        };
        if limit.offset > 0 {
            Self {
                top: None,
                needs_subquery: true,
                lower_bound: Some(limit.offset),
                upper_bound: (limit.limit > 0).then(|| limit.limit.saturating_add(limit.offset)),
            }
        } else if limit.limit > 0 {
            Self {
                top: Some(limit.limit),
                needs_subquery: false,
                lower_bound: None,
                upper_bound: None,
            }
        } else {
            Self::default()
        }
    }
}

/// Clause rewriting strategy, fixed for a connection's lifetime.
///
/// Dispatch is over the closed clause set (SELECT, FROM, ORDER BY,
/// LIMIT) with one build function per clause per strategy, in the style
/// of the statically dispatched dialect enum used elsewhere in this
/// family of tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteStrategy {
    /// Native `OFFSET ... FETCH` pagination.
    Modern,
    /// `ROW_NUMBER()` subquery emulation.
    Legacy,
}

impl RewriteStrategy {
    /// Select the strategy for a classified server.
    pub fn for_tier(tier: CapabilityTier) -> Self {
        match tier {
            CapabilityTier::Modern => RewriteStrategy::Modern,
            CapabilityTier::Legacy => RewriteStrategy::Legacy,
        }
    }

    /// Render a complete statement.
    ///
    /// Computes the pagination plan once, then invokes the per-clause
    /// builders in statement order. The FROM builder runs before the
    /// WHERE clause renders so that injected row-number bounds bind
    /// after the caller's own values.
    pub fn build_statement(&self, stmt: &mut Statement) -> String {
        stmt.reset_render_state();
        let plan = PaginationPlan::for_statement(stmt);

        let mut parts = Vec::with_capacity(5);
        parts.push(self.build_select(stmt, &plan));
        parts.push(self.build_from(stmt, &plan));
        if let Some(where_sql) = stmt.render_where() {
            parts.push(where_sql);
        }
        if let Some(order_by) = self.build_order_by(stmt, &plan) {
            parts.push(order_by);
        }
        if let Some(limit) = self.build_limit(stmt, &plan) {
            parts.push(limit);
        }
        parts.join(" ")
    }

    /// Build the SELECT clause.
    ///
    /// Legacy inserts the `TOP(n)` cap for offset-free limits; capping
    /// with an offset would double-limit against the subquery bounds,
    /// so the plan never sets both.
    pub fn build_select(&self, stmt: &Statement, plan: &PaginationPlan) -> String {
        match self {
            RewriteStrategy::Modern => stmt.render_default_select(),
            RewriteStrategy::Legacy => match plan.top {
                Some(top) => format!("SELECT TOP({top}) {}", stmt.projection()),
                None => stmt.render_default_select(),
            },
        }
    }

    /// Build the FROM clause.
    ///
    /// Legacy with an offset wraps the source in a subquery projecting
    /// the caller's select list plus a `ROW_NUMBER()` column ordered by
    /// the caller's ORDER BY, the primary key, or a constant no-op key,
    /// then injects `row` range predicates into the statement's
    /// condition list.
    pub fn build_from(&self, stmt: &mut Statement, plan: &PaginationPlan) -> String {
        if !matches!(self, RewriteStrategy::Legacy) || !plan.needs_subquery {
            return stmt.render_default_from();
        }

        let from = format!(
            "FROM (SELECT {projection}, ROW_NUMBER() OVER (ORDER BY {order}) AS row FROM {table}) a",
            projection = stmt.projection(),
            order = inner_order_expr(stmt),
            table = quote_ident(&stmt.table),
        );

        if let Some(lower) = plan.lower_bound {
            stmt.add_condition(Condition::injected("row > ?", vec![lower.into()]));
        }
        if let Some(upper) = plan.upper_bound {
            stmt.add_condition(Condition::injected("row <= ?", vec![upper.into()]));
        }

        from
    }

    /// Build the ORDER BY clause.
    ///
    /// Suppressed under legacy when the subquery rewrite already
    /// relocated the ordering into the `ROW_NUMBER()` window.
    pub fn build_order_by(&self, stmt: &Statement, plan: &PaginationPlan) -> Option<String> {
        match self {
            RewriteStrategy::Modern => stmt.render_default_order_by(),
            RewriteStrategy::Legacy if plan.needs_subquery => None,
            RewriteStrategy::Legacy => stmt.render_default_order_by(),
        }
    }

    /// Build the LIMIT clause.
    ///
    /// Legacy emits nothing here: its pagination values are consumed by
    /// the SELECT and FROM builders. Modern emits the native syntax,
    /// synthesizing an ORDER BY first when the caller supplied none
    /// (the syntax requires one to be present).
    pub fn build_limit(&self, stmt: &Statement, _plan: &PaginationPlan) -> Option<String> {
        if !matches!(self, RewriteStrategy::Modern) {
            return None;
        }
        let limit = stmt.limit?;
        if limit.limit == 0 && limit.offset == 0 {
            return None;
        }

        let mut out = String::new();
        if stmt
            .order_by
            .as_ref()
            .map_or(true, |ob| ob.columns.is_empty())
        {
            match &stmt.primary_key {
                Some(pk) => {
                    out.push_str("ORDER BY ");
                    out.push_str(&quote_ident(pk));
                    out.push(' ');
                }
                None => out.push_str("ORDER BY (SELECT NULL) "),
            }
        }

        if limit.offset > 0 {
            out.push_str(&format!("OFFSET {} ROWS", limit.offset));
        }
        if limit.limit > 0 {
            if limit.offset == 0 {
                out.push_str("OFFSET 0 ROW");
            }
            out.push_str(&format!(" FETCH NEXT {} ROWS ONLY", limit.limit));
        }
        Some(out)
    }
}

/// The ordering expression for the `ROW_NUMBER()` window: the caller's
/// ORDER BY if present, else the primary key, else a constant key.
/// Row-number assignment must stay reproducible across re-execution
/// with identical underlying data.
fn inner_order_expr(stmt: &Statement) -> String {
    if let Some(order_by) = stmt.order_by.as_ref().filter(|ob| !ob.columns.is_empty()) {
        order_by.render_expr()
    } else if let Some(pk) = &stmt.primary_key {
        quote_ident(pk)
    } else {
        "(SELECT NULL)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Limit;
    use crate::value::SqlValue;

    #[test]
    fn test_plan_no_pagination() {
        let stmt = Statement::new("Users");
        assert_eq!(PaginationPlan::for_statement(&stmt), PaginationPlan::default());

        let stmt = Statement::new("Users").limit(0).offset(0);
        assert_eq!(PaginationPlan::for_statement(&stmt), PaginationPlan::default());
    }

    #[test]
    fn test_plan_limit_without_offset_caps_with_top() {
        let stmt = Statement::new("Users").limit(10);
        let plan = PaginationPlan::for_statement(&stmt);
        assert_eq!(plan.top, Some(10));
        assert!(!plan.needs_subquery);
        assert_eq!(plan.lower_bound, None);
        assert_eq!(plan.upper_bound, None);
    }

    #[test]
    fn test_plan_offset_requires_subquery() {
        let stmt = Statement::new("Users").limit(10).offset(20);
        let plan = PaginationPlan::for_statement(&stmt);
        assert_eq!(plan.top, None);
        assert!(plan.needs_subquery);
        assert_eq!(plan.lower_bound, Some(20));
        assert_eq!(plan.upper_bound, Some(30));
    }

    #[test]
    fn test_plan_offset_without_limit_has_no_upper_bound() {
        let stmt = Statement::new("Users").offset(5);
        let plan = PaginationPlan::for_statement(&stmt);
        assert!(plan.needs_subquery);
        assert_eq!(plan.lower_bound, Some(5));
        assert_eq!(plan.upper_bound, None);
    }

    #[test]
    fn test_modern_limit_synthesizes_order_by_from_pk() {
        let mut stmt = Statement::new("users").primary_key("id").limit(10);
        let sql = RewriteStrategy::Modern.build_statement(&mut stmt);
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" ORDER BY \"id\" OFFSET 0 ROW FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_modern_limit_without_schema_uses_constant_order() {
        let mut stmt = Statement::new("users").limit(3);
        let sql = RewriteStrategy::Modern.build_statement(&mut stmt);
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" ORDER BY (SELECT NULL) OFFSET 0 ROW FETCH NEXT 3 ROWS ONLY"
        );
    }

    #[test]
    fn test_modern_offset_only() {
        let mut stmt = Statement::new("users").order_by("id", false).offset(5);
        let sql = RewriteStrategy::Modern.build_statement(&mut stmt);
        assert_eq!(sql, "SELECT * FROM \"users\" ORDER BY \"id\" OFFSET 5 ROWS");
    }

    #[test]
    fn test_modern_limit_and_offset() {
        let mut stmt = Statement::new("users").order_by("id", false).limit(10).offset(5);
        let sql = RewriteStrategy::Modern.build_statement(&mut stmt);
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" ORDER BY \"id\" OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_modern_no_pagination_is_plain_select() {
        let mut stmt = Statement::new("users").order_by("id", false);
        let sql = RewriteStrategy::Modern.build_statement(&mut stmt);
        assert_eq!(sql, "SELECT * FROM \"users\" ORDER BY \"id\"");
    }

    #[test]
    fn test_legacy_limit_without_offset_uses_top() {
        let mut stmt = Statement::new("users").limit(10);
        let sql = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert_eq!(sql, "SELECT TOP(10) * FROM \"users\"");
        assert!(stmt.vars().is_empty());
    }

    #[test]
    fn test_legacy_top_keeps_caller_order_by() {
        let mut stmt = Statement::new("users").order_by("name", false).limit(10);
        let sql = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert_eq!(sql, "SELECT TOP(10) * FROM \"users\" ORDER BY \"name\"");
    }

    #[test]
    fn test_legacy_offset_rewrites_into_subquery() {
        let mut stmt = Statement::new("users").primary_key("id").limit(10).offset(20);
        let sql = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert_eq!(
            sql,
            "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY \"id\") AS row \
             FROM \"users\") a WHERE row > @p1 AND row <= @p2"
        );
        assert_eq!(stmt.vars(), &[SqlValue::Uint(20), SqlValue::Uint(30)]);
    }

    #[test]
    fn test_legacy_subquery_relocates_caller_order_by() {
        let mut stmt = Statement::new("users").order_by("age", true).limit(10).offset(20);
        let sql = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert!(sql.contains("ROW_NUMBER() OVER (ORDER BY \"age\" DESC)"));
        // The outer ORDER BY is suppressed, not duplicated.
        assert!(!sql.contains(") a WHERE row > @p1 AND row <= @p2 ORDER BY"));
        assert!(sql.ends_with("WHERE row > @p1 AND row <= @p2"));
    }

    #[test]
    fn test_legacy_subquery_without_order_or_schema_uses_constant_key() {
        let mut stmt = Statement::new("users").offset(5);
        let sql = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert_eq!(
            sql,
            "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY (SELECT NULL)) AS row \
             FROM \"users\") a WHERE row > @p1"
        );
        assert_eq!(stmt.vars(), &[SqlValue::Uint(5)]);
    }

    #[test]
    fn test_legacy_subquery_projects_caller_select_list() {
        let mut stmt = Statement::new("users")
            .select(["id", "name"])
            .primary_key("id")
            .limit(10)
            .offset(20);
        let sql = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert!(sql.starts_with("SELECT \"id\", \"name\" FROM (SELECT \"id\", \"name\", ROW_NUMBER()"));
    }

    #[test]
    fn test_legacy_bounds_bind_after_caller_values() {
        let mut stmt = Statement::new("users")
            .filter("Active = ?", vec![SqlValue::Bool(true)])
            .primary_key("id")
            .limit(10)
            .offset(20);
        let sql = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert!(sql.contains("WHERE Active = @p1 AND row > @p2 AND row <= @p3"));
        assert_eq!(
            stmt.vars(),
            &[SqlValue::Bool(true), SqlValue::Uint(20), SqlValue::Uint(30)]
        );
    }

    #[test]
    fn test_legacy_rerender_does_not_duplicate_injected_bounds() {
        let mut stmt = Statement::new("users").primary_key("id").limit(10).offset(20);
        let first = RewriteStrategy::Legacy.build_statement(&mut stmt);
        let second = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert_eq!(first, second);
        assert!(second.ends_with("WHERE row > @p1 AND row <= @p2"));
        assert_eq!(stmt.vars(), &[SqlValue::Uint(20), SqlValue::Uint(30)]);
    }

    #[test]
    fn test_rerender_keeps_caller_conditions() {
        let mut stmt = Statement::new("users")
            .filter("Active = ?", vec![SqlValue::Bool(true)])
            .primary_key("id")
            .limit(10)
            .offset(20);
        RewriteStrategy::Legacy.build_statement(&mut stmt);
        let second = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert!(second.contains("WHERE Active = @p1 AND row > @p2 AND row <= @p3"));
        assert_eq!(
            stmt.vars(),
            &[SqlValue::Bool(true), SqlValue::Uint(20), SqlValue::Uint(30)]
        );
    }

    #[test]
    fn test_plan_upper_bound_saturates_on_extreme_values() {
        let stmt = Statement::new("users").limit(u64::MAX).offset(2);
        let plan = PaginationPlan::for_statement(&stmt);
        assert_eq!(plan.upper_bound, Some(u64::MAX));
    }

    #[test]
    fn test_legacy_no_pagination_is_plain_select() {
        let mut stmt = Statement::new("users").order_by("id", false);
        let sql = RewriteStrategy::Legacy.build_statement(&mut stmt);
        assert_eq!(sql, "SELECT * FROM \"users\" ORDER BY \"id\"");
    }

    #[test]
    fn test_strategy_for_tier() {
        assert_eq!(
            RewriteStrategy::for_tier(CapabilityTier::Modern),
            RewriteStrategy::Modern
        );
        assert_eq!(
            RewriteStrategy::for_tier(CapabilityTier::Legacy),
            RewriteStrategy::Legacy
        );
    }

    #[test]
    fn test_plan_limit_struct_zero_means_unset() {
        let stmt = Statement::new("users");
        assert_eq!(stmt.limit, None);
        let stmt = stmt.limit(7);
        assert_eq!(stmt.limit, Some(Limit { limit: 7, offset: 0 }));
    }
}
