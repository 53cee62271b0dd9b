//! INSERT statement builder.

use crate::builder::param::ParamList;
use crate::builder::traits::BuildStatement;
use crate::columns::{ColumnValues, Exclusions};
use crate::error::{CrudError, CrudResult};
use crate::ident::{parse_ident_list, quote_ident, quote_table};
use crate::statement::{Statement, StatementKind};
use crate::value::SqlValue;

/// INSERT statement builder.
///
/// Emits one column and one bound parameter per content entry that is not
/// excluded, in insertion order.
#[derive(Clone, Debug)]
pub struct InsertBuilder {
    table: String,
    contents: ColumnValues,
    excluded: Exclusions,
    returning: Option<String>,
}

impl InsertBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            contents: ColumnValues::new(),
            excluded: Exclusions::new(),
            returning: None,
        }
    }

    /// Set a column value.
    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.contents.insert(column, value);
        self
    }

    /// Replace the contents with a full column/value map.
    pub fn values(mut self, contents: ColumnValues) -> Self {
        self.contents = contents;
        self
    }

    /// Leave a column out of the statement.
    pub fn exclude(mut self, column: &str) -> Self {
        self.excluded.insert(column);
        self
    }

    /// Replace the exclusion set. The reserved exclusion always stays in effect.
    pub fn exclusions(mut self, excluded: Exclusions) -> Self {
        self.excluded = excluded;
        self
    }

    /// Set RETURNING columns (`"id"`, `"id, created_at"` or `"*"`).
    pub fn returning(mut self, cols: &str) -> Self {
        self.returning = Some(cols.to_string());
        self
    }
}

impl BuildStatement for InsertBuilder {
    fn build(&self) -> CrudResult<Statement> {
        let table = quote_table(&self.table)?;
        let mut params = ParamList::new();
        let mut columns = Vec::with_capacity(self.contents.len());
        let mut placeholders = Vec::with_capacity(self.contents.len());

        for (column, value) in self.contents.without(&self.excluded) {
            columns.push(quote_ident(column)?);
            placeholders.push(params.placeholder(value.clone()));
        }

        if columns.is_empty() {
            return Err(CrudError::validation(format!(
                "insert into {}: no columns left to insert",
                self.table.trim()
            )));
        }

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );

        if let Some(cols) = &self.returning {
            sql.push_str(" RETURNING ");
            sql.push_str(&parse_ident_list(cols)?);
        }

        Ok(Statement::new(StatementKind::Insert, sql, params.into_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::RESERVED_EXCLUSION;

    #[test]
    fn test_simple_insert() {
        let stmt = InsertBuilder::new("users")
            .set("username", "alice")
            .set("email", "alice@example.com")
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "INSERT INTO \"users\" (\"username\", \"email\") VALUES ($1, $2)"
        );
        assert_eq!(stmt.kind(), StatementKind::Insert);
        assert_eq!(stmt.params().len(), 2);
    }

    #[test]
    fn test_insert_with_returning() {
        let sql = InsertBuilder::new("users")
            .set("username", "alice")
            .returning("id")
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"username\") VALUES ($1) RETURNING \"id\""
        );
    }

    #[test]
    fn test_insert_skips_excluded_columns() {
        let contents = ColumnValues::new()
            .set("name", "ann")
            .set(RESERVED_EXCLUSION, "1048576")
            .set("csrf", "t0k3n")
            .set("age", 41);
        let stmt = InsertBuilder::new("people")
            .values(contents)
            .exclude("csrf")
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "INSERT INTO \"people\" (\"name\", \"age\") VALUES ($1, $2)"
        );
        assert_eq!(stmt.params(), &[SqlValue::from("ann"), SqlValue::from(41)]);
    }

    #[test]
    fn test_insert_all_excluded_is_rejected() {
        let err = InsertBuilder::new("uploads")
            .set(RESERVED_EXCLUSION, "1024")
            .build()
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_insert_empty_is_rejected() {
        assert!(InsertBuilder::new("users").build().unwrap_err().is_validation());
    }

    #[test]
    fn test_insert_blank_table_is_rejected() {
        let err = InsertBuilder::new("  ").set("a", 1).build().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_insert_bad_returning_is_rejected() {
        let err = InsertBuilder::new("users")
            .set("a", 1)
            .returning("id; DROP TABLE users")
            .build()
            .unwrap_err();
        assert!(err.is_validation());
    }
}
