//! SELECT statement builder.

use crate::builder::conditions::{MatchMode, Operand, WhereClause};
use crate::builder::order::OrderBy;
use crate::builder::param::ParamList;
use crate::builder::traits::BuildStatement;
use crate::columns::ColumnValues;
use crate::error::{CrudError, CrudResult};
use crate::ident::{parse_ident_list, quote_table};
use crate::statement::{Statement, StatementKind};
use crate::value::SqlValue;

/// SELECT statement builder.
///
/// Only constructs the statement; run it with
/// [`Database::execute`](crate::Database::execute) and read it with
/// [`Database::fetch`](crate::Database::fetch).
///
/// With no conditions the statement has no WHERE clause at all. Text values
/// in conditions are trimmed before binding.
#[derive(Clone, Debug)]
pub struct SelectBuilder {
    table: String,
    columns: String,
    conditions: ColumnValues,
    order: OrderBy,
    limit: Option<i64>,
    mode: MatchMode,
    operand: Operand,
    /// First error from a text-parsing setter, reported by `build`
    build_error: Option<String>,
}

impl SelectBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            conditions: ColumnValues::new(),
            order: OrderBy::new(),
            limit: None,
            mode: MatchMode::Exact,
            operand: Operand::And,
            build_error: None,
        }
    }

    /// Set SELECT columns: `"*"` or a comma-separated column list.
    pub fn columns(mut self, cols: &str) -> Self {
        match parse_ident_list(cols) {
            Ok(rendered) => self.columns = rendered,
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Add WHERE: column = value (or LIKE, see [`SelectBuilder::like`]).
    pub fn where_eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.conditions.insert(column, value);
        self
    }

    /// Replace the conditions with a full column/value map.
    pub fn conditions(mut self, conditions: ColumnValues) -> Self {
        self.conditions = conditions;
        self
    }

    /// Set ORDER BY from text such as `"id DESC, name"`. Blank text clears it.
    pub fn order_by(mut self, order: &str) -> Self {
        match OrderBy::parse(order) {
            Ok(order) => self.order = order,
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Set a pre-built ORDER BY list.
    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = order;
        self
    }

    /// Set LIMIT. Values below 1 mean no limit.
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

    /// Operator joining the conditions (default `AND`).
    pub fn operand(mut self, operand: Operand) -> Self {
        self.operand = operand;
        self
    }

    fn record_error(&mut self, err: CrudError) {
        if self.build_error.is_none() {
            self.build_error = Some(err.to_string());
        }
    }
}

impl BuildStatement for SelectBuilder {
    fn build(&self) -> CrudResult<Statement> {
        if let Some(err) = &self.build_error {
            return Err(CrudError::validation(format!("select: {err}")));
        }
        let table = quote_table(&self.table)?;
        let mut params = ParamList::new();
        let mut sql = format!("SELECT {} FROM {}", self.columns, table);

        if !self.conditions.is_empty() {
            let where_sql = WhereClause {
                conditions: &self.conditions,
                mode: self.mode,
                operand: self.operand,
                trim: true,
            }
            .render(&mut params)?;
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order.to_sql());
        }

        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        Ok(Statement::new(StatementKind::Select, sql, params.into_vec()))
    }
}
