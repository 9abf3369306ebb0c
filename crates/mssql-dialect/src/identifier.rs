//! Identifier quoting and bind-parameter placeholders.
//!
//! Quoting wraps each dot-separated segment of a (possibly qualified)
//! identifier individually, so `dbo.Users` renders as `"dbo"."Users"`.
//! Placeholders are positional `@p<n>` tokens numbered in strict append
//! order of the statement's bound values.

/// Quote an identifier, quoting each dot-separated segment individually.
///
/// # Examples
///
/// ```
/// use mssql_dialect::identifier::quote_ident;
///
/// assert_eq!(quote_ident("Users"), "\"Users\"");
/// assert_eq!(quote_ident("dbo.Users"), "\"dbo\".\"Users\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (idx, segment) in name.split('.').enumerate() {
        if idx > 0 {
            out.push('.');
        }
        out.push('"');
        out.push_str(segment);
        out.push('"');
    }
    out
}

/// Build the positional placeholder for the parameter with the given
/// 1-based ordinal.
///
/// The ordinal must equal the count of values bound on the statement
/// after this parameter's value is appended. Numbering in append order
/// keeps placeholders injected by the legacy pagination rewrite from
/// colliding with the caller's own bound values.
pub fn bind_placeholder(ordinal: usize) -> String {
    format!("@p{ordinal}")
}
