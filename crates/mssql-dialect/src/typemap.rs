//! Abstract column type to native T-SQL declaration mapping.
//!
//! A pure, total function: unrecognized kinds pass through their raw
//! tag rather than failing, so the mapper never rejects a column.

/// Abstract column type descriptor kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataKind {
    /// Boolean; maps to `bit`.
    Bool,
    /// Signed integer with a bit-width in `size`.
    Int,
    /// Unsigned integer with a bit-width in `size`.
    Uint,
    /// Floating point; maps to `float`.
    Float,
    /// Text with a character length in `size` (0 = unbounded).
    String,
    /// Date/time with timezone; maps to `datetimeoffset`.
    Time,
    /// Binary data; maps to `varbinary(MAX)`.
    Bytes,
    /// Any other dialect-specific tag, passed through verbatim.
    Other(String),
}

/// Abstract column description consumed by the type mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Type kind.
    pub kind: DataKind,
    /// Bit-width for integers, character length for strings; 0 = unset.
    pub size: u32,
    /// Part of the primary key.
    pub primary_key: bool,
    /// Identity/auto-increment column.
    pub auto_increment: bool,
    /// Carries an index or uniqueness marker.
    pub indexed: bool,
}

impl ColumnDef {
    /// Create a plain column of the given kind and size.
    pub fn new(kind: DataKind, size: u32) -> Self {
        Self {
            kind,
            size,
            primary_key: false,
            auto_increment: false,
            indexed: false,
        }
    }
}

/// `nvarchar` columns longer than this fall back to `nvarchar(MAX)`.
const NVARCHAR_FIXED_MAX: u32 = 4000;

/// Size substituted for indexed strings with no explicit length when
/// the configuration does not override it. Indexed `nvarchar(MAX)`
/// columns are not allowed by the server.
pub const DEFAULT_INDEXED_STRING_SIZE: u32 = 256;

/// Map a column descriptor to its native T-SQL type declaration.
///
/// `default_string_size` overrides the fallback length substituted for
/// indexed or primary-key strings that carry no explicit size; pass 0
/// to use [`DEFAULT_INDEXED_STRING_SIZE`].
pub fn native_type(col: &ColumnDef, default_string_size: u32) -> String {
    match &col.kind {
        DataKind::Bool => "bit".to_string(),
        DataKind::Int | DataKind::Uint => {
            let sql_type = match col.size {
                0..=15 => "smallint",
                16..=30 => "int",
                _ => "bigint",
            };
            if col.auto_increment {
                format!("{sql_type} IDENTITY(1,1)")
            } else {
                sql_type.to_string()
            }
        }
        DataKind::Float => "float".to_string(),
        DataKind::String => {
            let mut size = col.size;
            if (col.primary_key || col.indexed) && size == 0 {
                size = if default_string_size > 0 {
                    default_string_size
                } else {
                    DEFAULT_INDEXED_STRING_SIZE
                };
            }
            if size > 0 && size <= NVARCHAR_FIXED_MAX {
                format!("nvarchar({size})")
            } else {
                "nvarchar(MAX)".to_string()
            }
        }
        DataKind::Time => "datetimeoffset".to_string(),
        DataKind::Bytes => "varbinary(MAX)".to_string(),
        DataKind::Other(tag) => tag.clone(),
    }
}
