//! Trait implemented by every statement builder.

use crate::error::CrudResult;
use crate::statement::Statement;

/// A pure statement builder: no I/O, no side effects.
///
/// Building validates the inputs and returns the assembled [`Statement`], or a
/// [`CrudError::Validation`](crate::CrudError::Validation) before any SQL could be sent.
pub trait BuildStatement {
    /// Assemble the statement.
    fn build(&self) -> CrudResult<Statement>;

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> CrudResult<String> {
        Ok(self.build()?.sql().to_string())
    }
}

impl BuildStatement for Statement {
    fn build(&self) -> CrudResult<Statement> {
        Ok(self.clone())
    }
}
