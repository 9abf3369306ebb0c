//! # mssql-dialect
//!
//! SQL Server dialect adaptation layer for abstract query builders.
//!
//! Translates a database-agnostic clause model (SELECT / FROM /
//! ORDER BY / LIMIT-OFFSET) into the SQL text a specific SQL Server
//! deployment accepts, bridging the two incompatible pagination tiers:
//!
//! - **Capability classification**: parses the `SERVERPROPERTY`
//!   version/edition pair fetched at connection setup into a
//!   [`CapabilityTier`]
//! - **Clause rewriting**: native `OFFSET ... FETCH` on modern servers;
//!   `TOP(n)` capping and a `ROW_NUMBER()` subquery rewrite on legacy
//!   ones
//! - **Type mapping** from abstract column descriptors to T-SQL types
//! - **Identifier quoting** and positional `@p<n>` bind placeholders
//! - **Explain formatting** for readable query logging
//!
//! ## Example
//!
//! ```rust
//! use mssql_dialect::{Config, ServerIdentity, SqlServerDialect, Statement};
//!
//! # fn main() -> mssql_dialect::Result<()> {
//! let identity = ServerIdentity::new("15.0.2000.5", "Developer Edition (64-bit)");
//! let dialect = SqlServerDialect::from_identity(Config::default(), &identity)?;
//!
//! let mut stmt = Statement::new("users").primary_key("id").limit(10).offset(20);
//! let sql = dialect.build_statement(&mut stmt);
//! assert!(sql.contains("OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"));
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod dialect;
pub mod error;
pub mod explain;
pub mod identifier;
pub mod rewrite;
pub mod server;
pub mod statement;
pub mod typemap;
pub mod value;

// Re-exports for convenient access
pub use connection::{HostConnection, SERVER_IDENTITY_QUERY};
pub use dialect::{Config, SqlServerDialect};
pub use error::{DialectError, Result};
pub use rewrite::{PaginationPlan, RewriteStrategy};
pub use server::{CapabilityTier, Edition, ServerIdentity, ServerInfo};
pub use statement::{Condition, Limit, OrderBy, OrderByColumn, Statement};
pub use typemap::{ColumnDef, DataKind};
pub use value::SqlValue;
