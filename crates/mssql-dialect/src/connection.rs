//! Host connection boundary.
//!
//! The dialect never talks to the wire itself; the host framework hands
//! it a connection handle able to run the one-time identity probe and
//! the trivial text commands used for savepoint passthrough. Drivers
//! implement [`HostConnection`] over their own pool type.

use async_trait::async_trait;

use crate::error::Result;
use crate::server::ServerIdentity;

/// Query issued exactly once at connection setup to identify the server.
pub const SERVER_IDENTITY_QUERY: &str =
    "SELECT SERVERPROPERTY('productversion') AS version, SERVERPROPERTY('Edition') AS edition;";

/// Connection handle supplied by the host framework.
#[async_trait]
pub trait HostConnection: Send + Sync {
    /// Run [`SERVER_IDENTITY_QUERY`] and return the raw identity pair.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DialectError::Connection`] when the probe fails;
    /// connection setup aborts in that case.
    async fn fetch_server_identity(&self) -> Result<ServerIdentity>;

    /// Execute a plain text command with no result set
    /// (savepoint/rollback passthrough).
    async fn execute_raw(&self, sql: &str) -> Result<()>;
}
