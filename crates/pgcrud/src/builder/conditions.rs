//! WHERE clause assembly from column/value maps.

use crate::builder::param::ParamList;
use crate::columns::ColumnValues;
use crate::error::{CrudError, CrudResult};
use crate::ident::quote_ident;
use std::fmt;
use std::str::FromStr;

/// How a condition compares a column with its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// `"col" = $n`
    #[default]
    Exact,
    /// `"col"::text LIKE $n`, bound as `%value%`; works for any column type
    Like,
}

impl MatchMode {
    /// `true` selects [`MatchMode::Like`].
    pub fn from_like(like: bool) -> Self {
        if like { MatchMode::Like } else { MatchMode::Exact }
    }
}

/// Boolean operator joining WHERE conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operand {
    #[default]
    And,
    Or,
}

impl Operand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operand::And => "AND",
            Operand::Or => "OR",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operand {
    type Err = CrudError;

    /// Accepts `AND` / `OR` in any case; anything else is rejected.
    fn from_str(s: &str) -> CrudResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("AND") {
            Ok(Operand::And)
        } else if s.eq_ignore_ascii_case("OR") {
            Ok(Operand::Or)
        } else {
            Err(CrudError::validation(format!(
                "Unsupported operand '{s}' (expected AND or OR)"
            )))
        }
    }
}

/// A WHERE clause over a column/value map: one condition per entry.
pub(crate) struct WhereClause<'a> {
    pub(crate) conditions: &'a ColumnValues,
    pub(crate) mode: MatchMode,
    pub(crate) operand: Operand,
    /// Trim surrounding whitespace from text values before binding.
    pub(crate) trim: bool,
}

impl WhereClause<'_> {
    /// Render the conditions (without the `WHERE` keyword), binding values into `params`.
    pub(crate) fn render(&self, params: &mut ParamList) -> CrudResult<String> {
        let mut parts = Vec::with_capacity(self.conditions.len());
        for (column, value) in self.conditions.iter() {
            let column = quote_ident(column)?;
            let value = if self.trim { value.trimmed() } else { value.clone() };

            if value.is_null() {
                parts.push(format!("{column} IS NULL"));
                continue;
            }

            let part = match self.mode {
                MatchMode::Exact => format!("{column} = {}", params.placeholder(value)),
                MatchMode::Like => {
                    format!("{column}::text LIKE {}", params.placeholder(value.like_pattern()))
                }
            };
            parts.push(part);
        }
        Ok(parts.join(&format!(" {} ", self.operand)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    fn render(
        map: &ColumnValues,
        mode: MatchMode,
        operand: Operand,
        trim: bool,
    ) -> (String, Vec<SqlValue>) {
        let mut params = ParamList::new();
        let sql = WhereClause {
            conditions: map,
            mode,
            operand,
            trim,
        }
        .render(&mut params)
        .unwrap();
        (sql, params.into_vec())
    }

    #[test]
    fn test_exact_conditions() {
        let map = ColumnValues::new().set("a", " x ").set("b", 2);
        let (sql, params) = render(&map, MatchMode::Exact, Operand::And, true);
        assert_eq!(sql, "\"a\" = $1 AND \"b\" = $2");
        assert_eq!(params, vec![SqlValue::from("x"), SqlValue::from(2)]);
    }

    #[test]
    fn test_like_conditions_with_or() {
        let map = ColumnValues::new().set("name", "ann").set("city", "  Oslo");
        let (sql, params) = render(&map, MatchMode::Like, Operand::Or, true);
        assert_eq!(sql, "\"name\"::text LIKE $1 OR \"city\"::text LIKE $2");
        assert_eq!(params, vec![SqlValue::from("%ann%"), SqlValue::from("%Oslo%")]);
    }

    #[test]
    fn test_like_on_numeric_column_casts_to_text() {
        let map = ColumnValues::new().set("age", "3").set("score", 42);
        let (sql, params) = render(&map, MatchMode::Like, Operand::And, true);
        assert_eq!(sql, "\"age\"::text LIKE $1 AND \"score\"::text LIKE $2");
        assert_eq!(params, vec![SqlValue::from("%3%"), SqlValue::from("%42%")]);
    }

    #[test]
    fn test_untrimmed_values() {
        let map = ColumnValues::new().set("a", " x ");
        let (_, params) = render(&map, MatchMode::Exact, Operand::And, false);
        assert_eq!(params, vec![SqlValue::from(" x ")]);
    }

    #[test]
    fn test_null_condition_is_not_bound() {
        let map = ColumnValues::new()
            .set("deleted_at", SqlValue::Null)
            .set("id", 5);
        let (sql, params) = render(&map, MatchMode::Exact, Operand::And, true);
        assert_eq!(sql, "\"deleted_at\" IS NULL AND \"id\" = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_operand_parsing() {
        assert_eq!("and".parse::<Operand>().unwrap(), Operand::And);
        assert_eq!(" OR ".parse::<Operand>().unwrap(), Operand::Or);
        assert!("AND 1=1; --".parse::<Operand>().is_err());
        assert!("XOR".parse::<Operand>().is_err());
    }

    #[test]
    fn test_match_mode_from_like() {
        assert_eq!(MatchMode::from_like(true), MatchMode::Like);
        assert_eq!(MatchMode::from_like(false), MatchMode::Exact);
    }
}
