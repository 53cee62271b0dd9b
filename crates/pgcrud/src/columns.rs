//! Ordered column/value maps and exclusion sets.

use crate::value::SqlValue;
use std::collections::BTreeSet;

/// Column always excluded from INSERT/UPDATE content clauses.
///
/// HTML upload forms carry a `MAX_FILE_SIZE` hidden field; maps built straight
/// from form input would otherwise try to write it as a column.
pub const RESERVED_EXCLUSION: &str = "MAX_FILE_SIZE";

/// Ordered `(column, value)` pairs.
///
/// Insertion order is preserved and decides clause order in the generated SQL.
/// Setting a column that is already present replaces its value in place.
///
/// # Example
/// ```ignore
/// let contents = ColumnValues::new()
///     .set("name", "O'Brien")
///     .set("age", 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    entries: Vec<(String, SqlValue)>,
}

impl ColumnValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value (builder form).
    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Entries whose column is not excluded, in order.
    pub fn without<'a>(
        &'a self,
        excluded: &'a Exclusions,
    ) -> impl Iterator<Item = (&'a str, &'a SqlValue)> + 'a {
        self.iter().filter(move |(c, _)| !excluded.contains(c))
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnValues
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ColumnValues::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ColumnValues
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Columns to leave out of INSERT/UPDATE content clauses.
///
/// Always contains [`RESERVED_EXCLUSION`], whatever the caller adds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusions {
    columns: BTreeSet<String>,
}

impl Default for Exclusions {
    fn default() -> Self {
        let mut columns = BTreeSet::new();
        columns.insert(RESERVED_EXCLUSION.to_string());
        Self { columns }
    }
}

impl Exclusions {
    /// The default set: just [`RESERVED_EXCLUSION`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column (builder form).
    pub fn with(mut self, column: impl Into<String>) -> Self {
        self.columns.insert(column.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>) {
        self.columns.insert(column.into());
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Excluded column names, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Exclusions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Exclusions::new();
        for column in iter {
            set.insert(column);
        }
        set
    }
}
