//! DELETE statement builder.

use crate::builder::conditions::{MatchMode, Operand, WhereClause};
use crate::builder::param::ParamList;
use crate::builder::traits::BuildStatement;
use crate::columns::ColumnValues;
use crate::error::{CrudError, CrudResult};
use crate::ident::quote_table;
use crate::statement::{Statement, StatementKind};
use crate::value::SqlValue;

/// DELETE statement builder.
///
/// At least one condition is required; conditions are joined with `AND` and
/// text values are trimmed before binding.
///
/// PostgreSQL has no `DELETE ... LIMIT`, so a limit is applied through the row
/// identifiers of a limited sub-select:
/// `DELETE FROM t WHERE ctid IN (SELECT ctid FROM t WHERE ... LIMIT n)`.
#[derive(Clone, Debug)]
pub struct DeleteBuilder {
    table: String,
    conditions: ColumnValues,
    limit: Option<i64>,
    mode: MatchMode,
}

impl DeleteBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            conditions: ColumnValues::new(),
            limit: None,
            mode: MatchMode::Exact,
        }
    }

    /// Add WHERE: column = value (or LIKE, see [`DeleteBuilder::like`]).
    pub fn where_eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.conditions.insert(column, value);
        self
    }

    /// Replace the conditions with a full column/value map.
    pub fn conditions(mut self, conditions: ColumnValues) -> Self {
        self.conditions = conditions;
        self
    }

    /// Delete at most `n` rows. Values below 1 mean no limit.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = (n >= 1).then_some(n);
        self
    }

    /// Match with `LIKE '%value%'` instead of equality.
    pub fn like(mut self, like: bool) -> Self {
        self.mode = MatchMode::from_like(like);
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}

impl BuildStatement for DeleteBuilder {
    fn build(&self) -> CrudResult<Statement> {
        let table = quote_table(&self.table)?;
        if self.conditions.is_empty() {
            return Err(CrudError::validation(format!(
                "delete from {}: at least one condition is required",
                self.table.trim()
            )));
        }

        let mut params = ParamList::new();
        let where_sql = WhereClause {
            conditions: &self.conditions,
            mode: self.mode,
            operand: Operand::And,
            trim: true,
        }
        .render(&mut params)?;

        let sql = match self.limit {
            Some(n) => format!(
                "DELETE FROM {table} WHERE ctid IN (SELECT ctid FROM {table} WHERE {where_sql} LIMIT {n})"
            ),
            None => format!("DELETE FROM {table} WHERE {where_sql}"),
        };
        Ok(Statement::new(StatementKind::Delete, sql, params.into_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_delete() {
        let stmt = DeleteBuilder::new("users")
            .where_eq("id", "5")
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "DELETE FROM \"users\" WHERE \"id\" = $1");
        assert_eq!(stmt.kind(), StatementKind::Delete);
    }

    #[test]
    fn test_delete_without_conditions_is_rejected() {
        let err = DeleteBuilder::new("users").build().unwrap_err();
        assert!(err.is_validation());
        let err = DeleteBuilder::new("users")
            .conditions(ColumnValues::new())
            .limit(3)
            .build()
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete_like_trims_and_wraps() {
        let stmt = DeleteBuilder::new("sessions")
            .where_eq("agent", "  curl ")
            .like(true)
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "DELETE FROM \"sessions\" WHERE \"agent\"::text LIKE $1");
        assert_eq!(stmt.params(), &[SqlValue::from("%curl%")]);
    }

    #[test]
    fn test_delete_with_limit() {
        let sql = DeleteBuilder::new("jobs")
            .where_eq("state", "done")
            .where_eq("queue", "mail")
            .limit(100)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "DELETE FROM \"jobs\" WHERE ctid IN (SELECT ctid FROM \"jobs\" WHERE \"state\" = $1 AND \"queue\" = $2 LIMIT 100)"
        );
    }

    #[test]
    fn test_delete_ignores_non_positive_limit() {
        for n in [0, -1] {
            let sql = DeleteBuilder::new("jobs")
                .where_eq("id", 1)
                .limit(n)
                .to_sql()
                .unwrap();
            assert_eq!(sql, "DELETE FROM \"jobs\" WHERE \"id\" = $1");
        }
    }
}
