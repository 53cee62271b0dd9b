//! Result normalization.
//!
//! Shapes the rows of a query into one of three forms, decided by row count:
//!
//! - 0 rows → [`NormalizedResult::Empty`]
//! - 1 row → [`NormalizedResult::Single`] (not wrapped in a sequence)
//! - N rows → [`NormalizedResult::Many`], in the order the server returned them
//!
//! Each row becomes a [`RowMap`] addressed by column name, by position, or both
//! (see [`AddressingMode`]).

use crate::error::{CrudError, CrudResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Row access used by the normalizer.
///
/// Implemented for `tokio_postgres::Row`; anything that can report its column
/// names and decode a cell can be normalized.
pub trait RawRow {
    /// Number of columns in the row.
    fn column_count(&self) -> usize;

    /// Name of the column at `idx`.
    fn column_name(&self, idx: usize) -> &str;

    /// Decode the cell at `idx`.
    fn cell(&self, idx: usize) -> CrudResult<Value>;
}

/// How the keys of each normalized row are formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressingMode {
    /// Keys are column names.
    Assoc,
    /// Keys are 0-based column positions.
    Numeric,
    /// Every column appears under its position and under its name.
    #[default]
    Both,
}

impl AddressingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressingMode::Assoc => "assoc",
            AddressingMode::Numeric => "numeric",
            AddressingMode::Both => "both",
        }
    }

    /// Parse a mode name, falling back to the default ([`AddressingMode::Both`])
    /// for names that are not recognized.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(
                target: "pgcrud.sql",
                mode = name,
                "unknown addressing mode, using 'both'"
            );
            AddressingMode::default()
        })
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressingMode {
    type Err = CrudError;

    fn from_str(s: &str) -> CrudResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assoc" | "associative" => Ok(AddressingMode::Assoc),
            "numeric" | "num" => Ok(AddressingMode::Numeric),
            "both" => Ok(AddressingMode::Both),
            other => Err(CrudError::validation(format!(
                "Unknown addressing mode '{other}'"
            ))),
        }
    }
}

/// Key of a normalized row entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Name(String),
    Index(usize),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Name(name) => f.write_str(name),
            RowKey::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// One normalized row: ordered `(key, value)` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowMap {
    entries: Vec<(RowKey, Value)>,
}

impl RowMap {
    /// Value under a column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find_map(|(k, v)| match k {
            RowKey::Name(n) if n == name => Some(v),
            _ => None,
        })
    }

    /// Value under a column position.
    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.entries.iter().find_map(|(k, v)| match k {
            RowKey::Index(i) if *i == idx => Some(v),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RowKey, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Insert or overwrite. An existing key keeps its position.
    fn put(&mut self, key: RowKey, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl Serialize for RowMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

/// A normalized result set.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum NormalizedResult {
    /// No rows.
    #[default]
    Empty,
    /// Exactly one row.
    Single(RowMap),
    /// More than one row, in server order.
    Many(Vec<RowMap>),
}

impl NormalizedResult {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            NormalizedResult::Empty => 0,
            NormalizedResult::Single(_) => 1,
            NormalizedResult::Many(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NormalizedResult::Empty)
    }

    /// The first row, if any.
    pub fn first(&self) -> Option<&RowMap> {
        match self {
            NormalizedResult::Empty => None,
            NormalizedResult::Single(row) => Some(row),
            NormalizedResult::Many(rows) => rows.first(),
        }
    }

    /// Flatten into a list of rows regardless of shape.
    pub fn into_rows(self) -> Vec<RowMap> {
        match self {
            NormalizedResult::Empty => Vec::new(),
            NormalizedResult::Single(row) => vec![row],
            NormalizedResult::Many(rows) => rows,
        }
    }
}

fn normalize_row<R: RawRow>(row: &R, mode: AddressingMode) -> CrudResult<RowMap> {
    let count = row.column_count();
    let per_column = if mode == AddressingMode::Both { 2 } else { 1 };
    let mut map = RowMap {
        entries: Vec::with_capacity(count * per_column),
    };

    // A repeated column name keeps its first position and takes the last value.
    for idx in 0..count {
        let value = row.cell(idx)?;
        match mode {
            AddressingMode::Assoc => {
                map.put(RowKey::Name(row.column_name(idx).to_string()), value);
            }
            AddressingMode::Numeric => map.put(RowKey::Index(idx), value),
            AddressingMode::Both => {
                map.put(RowKey::Index(idx), value.clone());
                map.put(RowKey::Name(row.column_name(idx).to_string()), value);
            }
        }
    }
    Ok(map)
}

/// Normalize rows by count: none → `Empty`, one → `Single`, more → `Many`.
pub fn normalize<R: RawRow>(rows: &[R], mode: AddressingMode) -> CrudResult<NormalizedResult> {
    match rows {
        [] => Ok(NormalizedResult::Empty),
        [row] => Ok(NormalizedResult::Single(normalize_row(row, mode)?)),
        rows => rows
            .iter()
            .map(|row| normalize_row(row, mode))
            .collect::<CrudResult<Vec<_>>>()
            .map(NormalizedResult::Many),
    }
}
