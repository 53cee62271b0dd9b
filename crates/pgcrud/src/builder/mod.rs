//! Statement builders.
//!
//! Each builder turns a table name plus column/value maps into a [`Statement`]
//! without touching the database. Values are always bound as `$n` parameters;
//! table and column names are emitted as quoted identifiers.
//!
//! # Usage
//!
//! ```ignore
//! use pgcrud::builder;
//!
//! // INSERT
//! let stmt = builder::insert("users")
//!     .set("name", "O'Brien")
//!     .set("age", "30")
//!     .build()?;
//! // INSERT INTO "users" ("name", "age") VALUES ($1, $2)
//!
//! // SELECT
//! let stmt = builder::select("users")
//!     .order_by("id DESC")
//!     .limit(10)
//!     .build()?;
//! // SELECT * FROM "users" ORDER BY "id" DESC LIMIT 10
//! ```
//!
//! [`Statement`]: crate::Statement

mod conditions;
mod delete;
mod insert;
mod order;
mod param;
mod select;
mod traits;
mod update;

pub use conditions::{MatchMode, Operand};
pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use order::{Direction, OrderBy};
pub use select::SelectBuilder;
pub use traits::BuildStatement;
pub use update::UpdateBuilder;

/// Create an INSERT builder for the given table.
pub fn insert(table: &str) -> InsertBuilder {
    InsertBuilder::new(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> UpdateBuilder {
    UpdateBuilder::new(table)
}

/// Create a DELETE builder for the given table.
///
/// Building fails unless at least one condition is given.
pub fn delete(table: &str) -> DeleteBuilder {
    DeleteBuilder::new(table)
}

/// Create a SELECT builder for the given table.
pub fn select(table: &str) -> SelectBuilder {
    SelectBuilder::new(table)
}
