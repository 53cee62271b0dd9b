//! UPDATE statement builder.

use crate::builder::conditions::{MatchMode, Operand, WhereClause};
use crate::builder::param::ParamList;
use crate::builder::traits::BuildStatement;
use crate::columns::{ColumnValues, Exclusions};
use crate::error::{CrudError, CrudResult};
use crate::ident::{quote_ident, quote_table};
use crate::statement::{Statement, StatementKind};
use crate::value::SqlValue;

/// UPDATE statement builder.
///
/// SET values and WHERE values are both bound as parameters. Search
/// conditions are exact matches joined with `AND`; their values are not trimmed.
///
/// An UPDATE without search conditions is refused: there is no way to ask for
/// an unbounded update through this builder.
#[derive(Clone, Debug)]
pub struct UpdateBuilder {
    table: String,
    contents: ColumnValues,
    searches: ColumnValues,
    excluded: Exclusions,
}

impl UpdateBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            contents: ColumnValues::new(),
            searches: ColumnValues::new(),
            excluded: Exclusions::new(),
        }
    }

    /// Set a column value.
    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.contents.insert(column, value);
        self
    }

    /// Replace the SET contents with a full column/value map.
    pub fn values(mut self, contents: ColumnValues) -> Self {
        self.contents = contents;
        self
    }

    /// Add WHERE: column = value
    pub fn where_eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.searches.insert(column, value);
        self
    }

    /// Replace the WHERE conditions with a full column/value map.
    pub fn searches(mut self, searches: ColumnValues) -> Self {
        self.searches = searches;
        self
    }

    /// Leave a column out of the SET list.
    pub fn exclude(mut self, column: &str) -> Self {
        self.excluded.insert(column);
        self
    }

    /// Replace the exclusion set. The reserved exclusion always stays in effect.
    pub fn exclusions(mut self, excluded: Exclusions) -> Self {
        self.excluded = excluded;
        self
    }
}

impl BuildStatement for UpdateBuilder {
    fn build(&self) -> CrudResult<Statement> {
        let table = quote_table(&self.table)?;
        let mut params = ParamList::new();

        let mut assignments = Vec::with_capacity(self.contents.len());
        for (column, value) in self.contents.without(&self.excluded) {
            assignments.push(format!(
                "{} = {}",
                quote_ident(column)?,
                params.placeholder(value.clone())
            ));
        }
        if assignments.is_empty() {
            return Err(CrudError::validation(format!(
                "update {}: no columns left to set",
                self.table.trim()
            )));
        }
        if self.searches.is_empty() {
            return Err(CrudError::validation(format!(
                "update {}: search conditions are required",
                self.table.trim()
            )));
        }

        let where_sql = WhereClause {
            conditions: &self.searches,
            mode: MatchMode::Exact,
            operand: Operand::And,
            trim: false,
        }
        .render(&mut params)?;

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            table,
            assignments.join(", "),
            where_sql
        );
        Ok(Statement::new(StatementKind::Update, sql, params.into_vec()))
    }
}
