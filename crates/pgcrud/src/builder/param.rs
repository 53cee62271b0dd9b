//! Placeholder numbering for statement builders.

use crate::value::SqlValue;

/// Parameters collected while a statement is assembled.
///
/// Indices are computed at build time, never by rewriting SQL text.
#[derive(Clone, Debug, Default)]
pub(crate) struct ParamList {
    params: Vec<SqlValue>,
}

impl ParamList {
    pub(crate) fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub(crate) fn push(&mut self, value: SqlValue) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Add a parameter and return its `$n` placeholder.
    pub(crate) fn placeholder(&mut self, value: SqlValue) -> String {
        format!("${}", self.push(value))
    }

    pub(crate) fn into_vec(self) -> Vec<SqlValue> {
        self.params
    }
}
