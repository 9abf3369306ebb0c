//! Server identity classification.
//!
//! SQL Server exposes two incompatible pagination tiers: servers from
//! 2012 (major version 11) onward and all Azure-hosted editions support
//! native `OFFSET ... FETCH`, while older on-premise servers need a
//! `ROW_NUMBER()` emulation rewrite. This module parses the identity
//! pair returned by `SERVERPROPERTY` into a normalized [`ServerInfo`]
//! and derives the [`CapabilityTier`] for the connection.

use crate::error::{DialectError, Result};

/// Raw identity pair fetched once at connection setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    /// `SERVERPROPERTY('productversion')`, e.g. `"15.0.2000.5"`.
    pub product_version: String,
    /// `SERVERPROPERTY('Edition')`, e.g. `"Developer Edition (64-bit)"`.
    pub edition: String,
}

impl ServerIdentity {
    /// Create an identity pair from the raw probe strings.
    pub fn new(product_version: impl Into<String>, edition: impl Into<String>) -> Self {
        Self {
            product_version: product_version.into(),
            edition: edition.into(),
        }
    }

    /// Parse the identity pair into a normalized [`ServerInfo`].
    ///
    /// # Errors
    ///
    /// - [`DialectError::MissingIdentity`] if either string is empty.
    /// - [`DialectError::MalformedVersion`] if the first dot-segment of
    ///   the version is not an integer. A non-numeric second segment is
    ///   tolerated; the minor version is advisory only and defaults to 0.
    pub fn classify(&self) -> Result<ServerInfo> {
        if self.product_version.is_empty() {
            return Err(DialectError::MissingIdentity("version"));
        }
        if self.edition.is_empty() {
            return Err(DialectError::MissingIdentity("edition"));
        }

        let mut segments = self.product_version.split('.');
        let major = segments
            .next()
            .unwrap_or_default()
            .parse::<u32>()
            .map_err(|_| DialectError::MalformedVersion {
                version: self.product_version.clone(),
            })?;
        let minor = segments
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0);

        let is_64bit = self.edition.contains(MARKER_64BIT);
        let edition_label = if is_64bit {
            self.edition.replace(MARKER_64BIT, "").trim().to_string()
        } else {
            self.edition.clone()
        };

        Ok(ServerInfo {
            major,
            minor,
            edition: Edition::from_label(&edition_label),
            is_64bit,
        })
    }
}

const MARKER_64BIT: &str = "(64-bit)";

/// SQL Server edition category, ordered.
///
/// The ordering matters: everything below [`Edition::Azure`] is
/// on-premise and participates in the legacy-tier check, while Azure
/// editions are always modern regardless of version number. Labels
/// follow the documented `SERVERPROPERTY('Edition')` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Edition {
    Enterprise,
    Business,
    Developer,
    Express,
    ExpressAdvanced,
    Standard,
    Web,
    Azure,
    AzureEdge,
    AzureEdgeDeveloper,
    Unknown,
}

impl Edition {
    /// Map an edition label to its category.
    ///
    /// Unrecognized labels classify as [`Edition::Unknown`] rather than
    /// failing; an unknown edition must never abort connection setup.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Enterprise Edition"
            | "Enterprise Edition: Core-based Licensing"
            | "Enterprise Evaluation Edition" => Edition::Enterprise,
            "Business Intelligence Edition" => Edition::Business,
            "Developer Edition" => Edition::Developer,
            "Express Edition" => Edition::Express,
            "Express Edition with Advanced Services" => Edition::ExpressAdvanced,
            "Standard Edition" => Edition::Standard,
            "Web Edition" => Edition::Web,
            "SQL Azure" => Edition::Azure,
            "Azure SQL Edge" => Edition::AzureEdge,
            "Azure SQL Edge Developer" => Edition::AzureEdgeDeveloper,
            _ => Edition::Unknown,
        }
    }
}

/// Normalized server classification, computed once per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerInfo {
    /// Major version (11 = SQL Server 2012).
    pub major: u32,
    /// Minor version; advisory only.
    pub minor: u32,
    /// Edition category.
    pub edition: Edition,
    /// Whether the edition label carried the `(64-bit)` marker.
    pub is_64bit: bool,
}

impl ServerInfo {
    /// Whether the server lacks native `OFFSET ... FETCH` pagination.
    ///
    /// True iff the major version predates SQL Server 2012 and the
    /// edition is not Azure-hosted.
    pub fn is_legacy(&self) -> bool {
        self.major < 11 && self.edition < Edition::Azure
    }

    /// The pagination capability tier for this server.
    pub fn tier(&self) -> CapabilityTier {
        if self.is_legacy() {
            CapabilityTier::Legacy
        } else {
            CapabilityTier::Modern
        }
    }
}

/// Pagination capability tier of a connected server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityTier {
    /// Native `OFFSET ... ROWS FETCH NEXT ... ROWS ONLY`.
    Modern,
    /// `ROW_NUMBER()` subquery emulation required.
    Legacy,
}
