//! # pgcrud
//!
//! A single-connection PostgreSQL access layer.
//!
//! ## Features
//!
//! - **CRUD builders**: INSERT / UPDATE / DELETE / SELECT from a table name and ordered column→value maps
//! - **Bound values**: every value travels as a `$n` parameter, identifiers are always quoted
//! - **Safe defaults**: DELETE and UPDATE require conditions, empty clause lists are rejected
//! - **Result normalization**: zero, one or many rows, addressed by column name, position or both
//! - **Explicit handle**: one [`Database`] per connection, with timeouts and SQL tracing
//!
//! ## Example
//!
//! ```ignore
//! use pgcrud::prelude::*;
//!
//! let mut db = Database::connect(&DbConfig::from_env()?).await?;
//!
//! db.insert(insert("users").set("name", "O'Brien").set("age", "30")).await?;
//!
//! let rows = db
//!     .select(select("users").order_by("id DESC").limit(10), AddressingMode::Assoc)
//!     .await?;
//!
//! let removed = db.delete(delete("users").where_eq("id", "5")).await?;
//! ```

pub mod builder;
pub mod client;
pub mod columns;
pub mod database;
pub mod error;
pub mod ident;
pub mod normalize;
pub mod prelude;
pub mod row;
pub mod statement;
pub mod value;

pub use builder::{
    BuildStatement, DeleteBuilder, Direction, InsertBuilder, MatchMode, Operand, OrderBy,
    SelectBuilder, UpdateBuilder, delete, insert, select, update,
};
pub use client::{GenericClient, QueryOutput};
pub use columns::{ColumnValues, Exclusions, RESERVED_EXCLUSION};
pub use database::{Database, DbConfig};
pub use error::{CrudError, CrudResult};
pub use normalize::{AddressingMode, NormalizedResult, RawRow, RowKey, RowMap, normalize};
pub use statement::{Statement, StatementKind};
pub use value::{SqlValue, escape_literal};
