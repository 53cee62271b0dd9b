//! Assembled SQL statements.

use crate::error::{CrudError, CrudResult};
use crate::value::SqlValue;
use std::fmt;
use tokio_postgres::types::ToSql;

/// The type of SQL operation a statement performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    /// Anything else (DDL, SET, CTEs, ...)
    Other,
}

impl StatementKind {
    /// Detect the statement kind from its leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = strip_sql_prefix(sql);
        if starts_with_keyword(trimmed, "SELECT") {
            StatementKind::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            StatementKind::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            StatementKind::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Other => "OTHER",
        }
    }
}

/// Strip leading whitespace, SQL comments (`--` and `/* */`), and parentheses
/// to find the first meaningful keyword.
fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") {
            match s.find('\n') {
                Some(pos) => {
                    s = &s[pos + 1..];
                    continue;
                }
                None => return "",
            }
        }
        if s.starts_with("/*") {
            match s.find("*/") {
                Some(pos) => {
                    s = &s[pos + 2..];
                    continue;
                }
                None => return "",
            }
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            break;
        }
    }
    s
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    s.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
        && s[keyword.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'))
}

/// An immutable SQL statement: text with `$n` placeholders plus the values bound to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<SqlValue>,
    kind: StatementKind,
}

impl Statement {
    pub(crate) fn new(kind: StatementKind, sql: String, params: Vec<SqlValue>) -> Self {
        Self { sql, params, kind }
    }

    /// Wrap hand-written SQL with no parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let kind = StatementKind::from_sql(&sql);
        Self {
            sql,
            params: Vec::new(),
            kind,
        }
    }

    /// Wrap hand-written SQL using pre-numbered `$1, $2, ...` placeholders.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        let sql = sql.into();
        let kind = StatementKind::from_sql(&sql);
        Self { sql, params, kind }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    /// Render the statement with every placeholder replaced by an escaped literal.
    ///
    /// For logs and debugging only; execution always binds parameters.
    pub fn to_inline_sql(&self) -> CrudResult<String> {
        let mut out = String::with_capacity(self.sql.len());
        let mut chars = self.sql.chars().peekable();
        let mut quote: Option<char> = None;

        while let Some(c) = chars.next() {
            match quote {
                Some(q) => {
                    if c == q {
                        quote = None;
                    }
                    out.push(c);
                }
                None if c == '"' || c == '\'' => {
                    quote = Some(c);
                    out.push(c);
                }
                None if c == '$' && chars.peek().is_some_and(|d| d.is_ascii_digit()) => {
                    let mut digits = String::new();
                    while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                        digits.push(*d);
                        chars.next();
                    }
                    let index: usize = digits
                        .parse()
                        .map_err(|_| CrudError::validation(format!("Bad placeholder ${digits}")))?;
                    let value = index
                        .checked_sub(1)
                        .and_then(|i| self.params.get(i))
                        .ok_or_else(|| {
                            CrudError::validation(format!("No parameter bound for ${index}"))
                        })?;
                    out.push_str(&value.to_literal()?);
                }
                None => out.push(c),
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_detection() {
        assert_eq!(StatementKind::from_sql("select 1"), StatementKind::Select);
        assert_eq!(
            StatementKind::from_sql("  -- note\n INSERT INTO t VALUES (1)"),
            StatementKind::Insert
        );
        assert_eq!(
            StatementKind::from_sql("/* x */ (SELECT 1)"),
            StatementKind::Select
        );
        assert_eq!(StatementKind::from_sql("UPDATEX"), StatementKind::Other);
        assert_eq!(StatementKind::from_sql("SET client_encoding TO 'UTF8'"), StatementKind::Other);
        assert_eq!(StatementKind::from_sql(""), StatementKind::Other);
    }

    #[test]
    fn test_inline_sql_escapes_values() {
        let stmt = Statement::with_params(
            "SELECT * FROM \"t\" WHERE \"name\" = $1 AND \"age\" = $2",
            vec![SqlValue::from("O'Brien"), SqlValue::from(30)],
        );
        assert_eq!(
            stmt.to_inline_sql().unwrap(),
            "SELECT * FROM \"t\" WHERE \"name\" = 'O''Brien' AND \"age\" = 30"
        );
    }

    #[test]
    fn test_inline_sql_skips_quoted_dollars() {
        let stmt = Statement::with_params(
            "SELECT \"a$1\" FROM t WHERE x = $1 AND y = '$2'",
            vec![SqlValue::from(7)],
        );
        assert_eq!(
            stmt.to_inline_sql().unwrap(),
            "SELECT \"a$1\" FROM t WHERE x = 7 AND y = '$2'"
        );
    }

    #[test]
    fn test_inline_sql_missing_param() {
        let stmt = Statement::with_params("SELECT $2", vec![SqlValue::from(1)]);
        assert!(stmt.to_inline_sql().is_err());
        let stmt = Statement::raw("SELECT $0");
        assert!(stmt.to_inline_sql().is_err());
    }

    #[test]
    fn test_raw_statement() {
        let stmt = Statement::raw("DELETE FROM t");
        assert_eq!(stmt.kind(), StatementKind::Delete);
        assert!(stmt.params().is_empty());
        assert_eq!(stmt.to_string(), "DELETE FROM t");
    }
}
