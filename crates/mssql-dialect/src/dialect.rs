//! The SQL Server dialect entry point.
//!
//! [`SqlServerDialect::initialize`] runs the one-time connection setup
//! sequence: probe the server identity, classify it, and install the
//! matching clause-rewrite strategy. The resulting dialect is immutable;
//! every statement built on the connection uses the same strategy, so a
//! single statement's clauses are never rewritten by a mixture of
//! strategies. All per-statement hooks (`quote_ident`, `bind_var`,
//! `data_type_of`, `explain`, the clause builders) are read-only with
//! respect to the dialect and safe to call from concurrent builders.

use serde::Deserialize;
use tracing::{info, warn};

use crate::connection::HostConnection;
use crate::error::Result;
use crate::explain;
use crate::identifier;
use crate::rewrite::RewriteStrategy;
use crate::server::{CapabilityTier, ServerIdentity, ServerInfo};
use crate::statement::Statement;
use crate::typemap::{self, ColumnDef};
use crate::value::SqlValue;

/// Dialect configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Driver name to register under (default: "sqlserver").
    #[serde(default = "default_driver_name")]
    pub driver_name: String,

    /// Connection string, passed through to the driver layer.
    #[serde(default)]
    pub dsn: String,

    /// Length substituted for indexed string columns with no explicit
    /// size; 0 uses the built-in fallback of 256.
    #[serde(default)]
    pub default_string_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver_name: default_driver_name(),
            dsn: String::new(),
            default_string_size: 0,
        }
    }
}

fn default_driver_name() -> String {
    "sqlserver".to_string()
}

/// A classified SQL Server dialect with its installed rewrite strategy.
#[derive(Debug, Clone)]
pub struct SqlServerDialect {
    config: Config,
    info: ServerInfo,
    strategy: RewriteStrategy,
}

impl SqlServerDialect {
    /// Dialect identifier.
    pub const NAME: &'static str = "sqlserver";

    /// Probe the server identity over the host connection and build the
    /// dialect for it.
    ///
    /// # Errors
    ///
    /// Propagates probe failures and classification errors
    /// ([`crate::DialectError::MissingIdentity`],
    /// [`crate::DialectError::MalformedVersion`]); the host must abort
    /// connection setup on any of them.
    pub async fn initialize<C: HostConnection>(config: Config, conn: &C) -> Result<Self> {
        let identity = conn.fetch_server_identity().await?;
        Self::from_identity(config, &identity)
    }

    /// Build the dialect from an already-fetched identity pair.
    ///
    /// Classification is pure: the same identity always yields the same
    /// tier. An unsupported (legacy) server logs a warning but does not
    /// fail; the emulation strategy is installed instead.
    pub fn from_identity(config: Config, identity: &ServerIdentity) -> Result<Self> {
        let info = identity.classify()?;
        info!(
            "found server with version: {} {}",
            identity.edition, identity.product_version
        );

        if info.is_legacy() {
            warn!(
                "this version of SQL server ({}) is unsupported. some backwards \
                 compatibility has been implemented but may be incomplete",
                identity.product_version
            );
        }

        Ok(Self {
            strategy: RewriteStrategy::for_tier(info.tier()),
            config,
            info,
        })
    }

    /// The dialect name registered with the host framework.
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// The classified server information.
    pub fn server_info(&self) -> ServerInfo {
        self.info
    }

    /// The capability tier this connection was classified into.
    pub fn tier(&self) -> CapabilityTier {
        self.info.tier()
    }

    /// The installed clause-rewrite strategy.
    pub fn strategy(&self) -> RewriteStrategy {
        self.strategy
    }

    /// Render a statement with the installed strategy.
    pub fn build_statement(&self, stmt: &mut Statement) -> String {
        self.strategy.build_statement(stmt)
    }

    /// Quote a (possibly dot-qualified) identifier.
    pub fn quote_ident(&self, name: &str) -> String {
        identifier::quote_ident(name)
    }

    /// Bind a value on the statement and return its placeholder.
    pub fn bind_var(&self, stmt: &mut Statement, value: SqlValue) -> String {
        stmt.add_var(value)
    }

    /// Map an abstract column descriptor to its native type declaration.
    pub fn data_type_of(&self, col: &ColumnDef) -> String {
        typemap::native_type(col, self.config.default_string_size)
    }

    /// The default value expression for columns with no explicit default.
    pub fn default_value_expr(&self) -> &'static str {
        "NULL"
    }

    /// Render a SQL string with bound values substituted, for logging.
    pub fn explain(&self, sql: &str, vars: &[SqlValue]) -> String {
        explain::explain(sql, vars)
    }

    /// Create a transaction savepoint (text-command passthrough).
    pub async fn save_point<C: HostConnection>(&self, conn: &C, name: &str) -> Result<()> {
        conn.execute_raw(&format!("SAVE TRANSACTION {name}")).await
    }

    /// Roll back to a named savepoint (text-command passthrough).
    pub async fn rollback_to<C: HostConnection>(&self, conn: &C, name: &str) -> Result<()> {
        conn.execute_raw(&format!("ROLLBACK TRANSACTION {name}"))
            .await
    }
}
