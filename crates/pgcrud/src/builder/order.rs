//! ORDER BY lists restricted to `column [ASC|DESC]` items.

use crate::error::{CrudError, CrudResult};
use crate::ident::quote_plain;
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// An ORDER BY list.
///
/// Built either programmatically or parsed from text such as `"id DESC, name"`.
/// Parsing accepts only plain (optionally dotted) column names followed by an
/// optional `ASC`/`DESC`; expressions, functions and anything else are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy {
    items: Vec<(String, Direction)>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ascending item.
    pub fn asc(self, column: &str) -> CrudResult<Self> {
        self.push(column, Direction::Asc)
    }

    /// Add a descending item.
    pub fn desc(self, column: &str) -> CrudResult<Self> {
        self.push(column, Direction::Desc)
    }

    fn push(mut self, column: &str, direction: Direction) -> CrudResult<Self> {
        self.items.push((quote_plain(column.trim())?, direction));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the list without the `ORDER BY` keyword.
    pub fn to_sql(&self) -> String {
        self.items
            .iter()
            .map(|(col, dir)| format!("{col} {}", dir.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse a comma-separated list. Blank input yields an empty list.
    pub fn parse(s: &str) -> CrudResult<Self> {
        let s = s.trim();
        let mut order = OrderBy::new();
        if s.is_empty() {
            return Ok(order);
        }
        for item in s.split(',') {
            let mut words = item.split_whitespace();
            let column = words
                .next()
                .ok_or_else(|| CrudError::validation("Empty ORDER BY item"))?;
            let direction = match words.next() {
                None => Direction::Asc,
                Some(w) if w.eq_ignore_ascii_case("ASC") => Direction::Asc,
                Some(w) if w.eq_ignore_ascii_case("DESC") => Direction::Desc,
                Some(w) => {
                    return Err(CrudError::validation(format!(
                        "Invalid ORDER BY direction '{w}'"
                    )));
                }
            };
            if let Some(extra) = words.next() {
                return Err(CrudError::validation(format!(
                    "Unexpected '{extra}' in ORDER BY item '{}'",
                    item.trim()
                )));
            }
            order = order.push(column, direction)?;
        }
        Ok(order)
    }
}

impl FromStr for OrderBy {
    type Err = CrudError;

    fn from_str(s: &str) -> CrudResult<Self> {
        OrderBy::parse(s)
    }
}
