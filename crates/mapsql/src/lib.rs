//! # mapsql
//!
//! A mapping-driven SQL statement builder.
//!
//! Given a declared schema (field name → logical type), a table name and
//! data / filter objects, `mapsql` produces MySQL statement text for INSERT,
//! REPLACE, UPDATE, DELETE, SELECT and COUNT. It never talks to a database.
//!
//! ## Features
//!
//! - **Type-checked fields**: every value is checked against its declared
//!   [`FieldType`]; data objects drop mismatches, where objects reject them
//! - **Geometry literals**: `{x, y}` points become `POINT(x,y)`, point lists
//!   become `ST_GeomFromText('POLYGON(...)')`
//! - **Filter algebra**: equality maps, or `and` / `or` groups with `>`, `<`,
//!   `>=`, `<=`, `in` and `not in`
//! - **Pluggable escaping**: all literals and identifiers go through a
//!   [`SqlFormatter`] ([`MysqlFormatter`] by default)
//!
//! ## Example
//!
//! ```ignore
//! use mapsql::{record, FieldType, Mapping, QueryRequest};
//!
//! let mapping = Mapping::new()
//!     .field("user_id", FieldType::Number)
//!     .field("name", FieldType::String);
//!
//! let sql = mapsql::query(
//!     &QueryRequest::new("users", mapping)
//!         .with_where(record! {
//!             "and" => record! { "user_id" => record! { ">=" => 10 } },
//!             "or" => record! { "name" => "alice" },
//!         })
//!         .with_offset(vec![0, 20])
//!         .with_count("total"),
//! )?;
//! // SELECT * FROM users WHERE `user_id` >= 10 OR `name` = 'alice' LIMIT 0, 20;
//! // SELECT COUNT(*) AS `total` FROM users WHERE `user_id` >= 10 OR `name` = 'alice'
//! ```
//!
//! ## Logging
//!
//! With the default `tracing` feature every built statement is emitted as a
//! `debug` event on target `mapsql.sql`; dropped data fields are reported at
//! `trace` level on `mapsql.extract`.

pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod format;
pub mod geometry;
pub mod ident;
pub mod mapping;
pub mod prelude;
pub mod request;
pub mod statement;
pub mod validate;
pub mod value;

pub use config::{BuilderConfig, LimitPolicy, Page};
pub use error::{Argument, Axis, BuildError, BuildResult};
pub use format::{MysqlFormatter, SqlFormatter};
pub use mapping::{FieldType, Mapping};
pub use request::{
    CountRequest, DeleteRequest, GetRequest, InsertRequest, QueryRequest, UpdateRequest,
};
pub use statement::{SqlMapper, StatementKind};
pub use value::{Record, Value};

// ==================== Free functions (default MySQL mapper) ====================

/// Build an `INSERT` statement. See [`SqlMapper::insert`].
pub fn insert(request: &InsertRequest) -> BuildResult<String> {
    SqlMapper::new().insert(request)
}

/// Build a `REPLACE` statement. See [`SqlMapper::replace`].
pub fn replace(request: &InsertRequest) -> BuildResult<String> {
    SqlMapper::new().replace(request)
}

/// Build an `UPDATE` with an equality where object.
pub fn update(request: &UpdateRequest) -> BuildResult<String> {
    SqlMapper::new().update(request)
}

/// Build an `UPDATE` with an `and` / `or` filter.
pub fn advanced_update(request: &UpdateRequest) -> BuildResult<String> {
    SqlMapper::new().advanced_update(request)
}

/// Build a `DELETE` with an equality where object.
pub fn remove(request: &DeleteRequest) -> BuildResult<String> {
    SqlMapper::new().remove(request)
}

/// Alias of [`remove`].
pub fn delete(request: &DeleteRequest) -> BuildResult<String> {
    remove(request)
}

/// Build a `DELETE` with an `and` / `or` filter.
pub fn advanced_remove(request: &DeleteRequest) -> BuildResult<String> {
    SqlMapper::new().advanced_remove(request)
}

/// Alias of [`advanced_remove`].
pub fn advanced_delete(request: &DeleteRequest) -> BuildResult<String> {
    advanced_remove(request)
}

/// Build a `SELECT` with an equality where object.
pub fn get(request: &GetRequest) -> BuildResult<String> {
    SqlMapper::new().get(request)
}

/// Build a `SELECT` with an `and` / `or` filter, plus an optional count.
pub fn query(request: &QueryRequest) -> BuildResult<String> {
    SqlMapper::new().query(request)
}

/// Build a standalone `SELECT COUNT(*)`.
pub fn count(request: &CountRequest) -> BuildResult<String> {
    SqlMapper::new().count(request)
}
