//! Convenient imports for typical `pgcrud` usage.
//!
//! ```ignore
//! use pgcrud::prelude::*;
//! ```

pub use crate::{
    AddressingMode, BuildStatement, ColumnValues, CrudError, CrudResult, Database, DbConfig,
    Exclusions, NormalizedResult, Operand, OrderBy, SqlValue, Statement, delete, insert, select,
    update,
};
