//! SQL identifier quoting.
//!
//! Table and column names passed to the builders are trusted structural input:
//! they are never checked against a schema, but they are always emitted as
//! quoted identifiers (`"name"`, with embedded `"` doubled) so a name can never
//! end the identifier early.
//!
//! Free-form identifier lists that arrive as strings (`"id, name"`, ORDER BY
//! items) are held to a stricter shape: each part must match
//! `[A-Za-z_][A-Za-z0-9_$]*`, optionally dotted (`u.id`).

use crate::error::{CrudError, CrudResult};

/// Quote a single identifier.
///
/// Rejects blank names and names containing NUL.
pub fn quote_ident(name: &str) -> CrudResult<String> {
    if name.trim().is_empty() {
        return Err(CrudError::validation("Identifier cannot be empty"));
    }
    if name.contains('\0') {
        return Err(CrudError::validation(
            "Identifier cannot contain NUL character",
        ));
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote a table name, treating `.` as a schema separator (`public.users`).
pub fn quote_table(name: &str) -> CrudResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CrudError::validation("Table name cannot be empty"));
    }
    let parts = name
        .split('.')
        .map(quote_ident)
        .collect::<CrudResult<Vec<_>>>()?;
    Ok(parts.join("."))
}

/// Check that `s` is a plain (unquoted) identifier, optionally dotted.
pub fn is_plain_ident(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_plain_part)
}

fn is_plain_part(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

/// Validate and quote a plain identifier given as text (dotted parts quoted separately).
pub fn quote_plain(s: &str) -> CrudResult<String> {
    if !is_plain_ident(s) {
        return Err(CrudError::validation(format!("Invalid identifier: '{s}'")));
    }
    quote_table(s)
}

/// Parse a comma-separated identifier list (`"id, name"`) or `*`.
///
/// Returns the rendered list, e.g. `"id", "name"`.
pub fn parse_ident_list(s: &str) -> CrudResult<String> {
    let s = s.trim();
    if s.is_empty() || s == "*" {
        return Ok("*".to_string());
    }
    let parts = s
        .split(',')
        .map(|part| quote_plain(part.trim()))
        .collect::<CrudResult<Vec<_>>>()?;
    Ok(parts.join(", "))
}
