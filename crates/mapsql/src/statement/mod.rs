//! Statement assembly.
//!
//! [`SqlMapper`] validates a request, runs the extractor and filter compilers
//! and joins their fragments into the final statement text:
//!
//! | Operation | Statement |
//! |---|---|
//! | `insert` / `replace` | `INSERT INTO t SET <geometry><assignments>` |
//! | `update` / `advanced_update` | `UPDATE t SET <set> <where>` |
//! | `remove` / `advanced_remove` | `DELETE FROM t <where>` |
//! | `get` / `query` | `SELECT <cols> FROM t [where][ ORDER BY][ LIMIT]` |
//! | `count` | `SELECT COUNT(*) AS alias FROM t [where]` |
//!
//! `get` and the `remove`/`update` pair use the equality-only where object;
//! the `advanced_*`, `query` and `count` operations use the `and`/`or` filter.

use crate::config::BuilderConfig;
use crate::error::{Argument, BuildError, BuildResult};
use crate::extract::extract_data;
use crate::filter::{Filter, SimpleWhere};
use crate::format::{MysqlFormatter, SqlFormatter};
use crate::ident::validate_table;
use crate::mapping::Mapping;
use crate::request::{
    CountRequest, DeleteRequest, GetRequest, InsertRequest, QueryRequest, UpdateRequest,
};
use crate::validate::{check_count, check_offset, check_order, require, select_columns};
use crate::value::Record;
use std::fmt;
use std::fmt::Write as _;


/// Kind of statement produced by a build, reported in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Insert,
    Replace,
    Update,
    Delete,
    /// SELECT, optionally followed by a COUNT statement
    Select,
    /// Standalone COUNT(*)
    Count,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Insert => "INSERT",
            StatementKind::Replace => "REPLACE",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Select => "SELECT",
            StatementKind::Count => "COUNT",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping-driven statement builder.
///
/// Holds only immutable configuration and a stateless [`SqlFormatter`], so a
/// single instance can be shared freely across threads.
///
/// # Example
/// ```ignore
/// use mapsql::{record, FieldType, InsertRequest, Mapping, SqlMapper};
///
/// let mapping = Mapping::new()
///     .field("user_id", FieldType::Number)
///     .field("name", FieldType::String);
/// let request = InsertRequest::new("users", mapping)
///     .with_data(record! { "user_id" => 1, "name" => "alice" });
///
/// let sql = SqlMapper::new().insert(&request)?;
/// assert_eq!(sql, "INSERT INTO users SET `user_id` = 1, `name` = 'alice'");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlMapper<F = MysqlFormatter> {
    config: BuilderConfig,
    formatter: F,
}

impl SqlMapper {
    /// Create a mapper with the MySQL formatter and the strict default config.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: SqlFormatter> SqlMapper<F> {
    /// Create a mapper around a custom escaping primitive.
    pub fn with_formatter(formatter: F) -> Self {
        Self {
            config: BuilderConfig::default(),
            formatter,
        }
    }

    /// Replace the builder configuration.
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    // ==================== Write statements ====================

    /// `INSERT INTO <table> SET ...`
    pub fn insert(&self, request: &InsertRequest) -> BuildResult<String> {
        self.write_into(StatementKind::Insert, request)
    }

    /// `REPLACE INTO <table> SET ...`
    pub fn replace(&self, request: &InsertRequest) -> BuildResult<String> {
        self.write_into(StatementKind::Replace, request)
    }

    fn write_into(&self, kind: StatementKind, request: &InsertRequest) -> BuildResult<String> {
        let data = require(request.data.as_ref(), Argument::Data)?;
        let (mapping, table) = target(request.mapping.as_ref(), request.table_name.as_deref())?;

        let set = extract_data(data, mapping)?.render_set(&self.formatter);
        Ok(emit(kind, format!("{kind} INTO {table} SET {set}")))
    }

    /// `UPDATE <table> SET ... WHERE a = ? AND b = ?`
    pub fn update(&self, request: &UpdateRequest) -> BuildResult<String> {
        let (data, filter, mapping, table) = update_args(request)?;

        let where_sql = SimpleWhere::compile(filter, mapping)?.render(&self.formatter);
        let set = extract_data(data, mapping)?.render_set(&self.formatter);
        Ok(emit(
            StatementKind::Update,
            format!("UPDATE {table} SET {set} {where_sql}"),
        ))
    }

    /// `UPDATE <table> SET ... WHERE <and/or filter>`
    pub fn advanced_update(&self, request: &UpdateRequest) -> BuildResult<String> {
        let (data, filter, mapping, table) = update_args(request)?;

        let set = extract_data(data, mapping)?.render_set(&self.formatter);
        let where_sql = Filter::compile(filter, mapping)?.render(&self.formatter);
        Ok(emit(
            StatementKind::Update,
            format!("UPDATE {table} SET {set} {where_sql}"),
        ))
    }

    /// `DELETE FROM <table> WHERE a = ? AND b = ?`
    ///
    /// Without a where object the statement targets every row.
    pub fn remove(&self, request: &DeleteRequest) -> BuildResult<String> {
        let (mapping, table) = target(request.mapping.as_ref(), request.table_name.as_deref())?;

        let where_sql = match &request.filter {
            Some(filter) => SimpleWhere::compile(filter, mapping)?.render(&self.formatter),
            None => String::new(),
        };
        Ok(emit(
            StatementKind::Delete,
            format!("DELETE FROM {table} {where_sql}"),
        ))
    }

    /// Alias of [`remove`](Self::remove).
    pub fn delete(&self, request: &DeleteRequest) -> BuildResult<String> {
        self.remove(request)
    }

    /// `DELETE FROM <table> WHERE <and/or filter>`
    pub fn advanced_remove(&self, request: &DeleteRequest) -> BuildResult<String> {
        let (mapping, table) = target(request.mapping.as_ref(), request.table_name.as_deref())?;

        let where_sql = match &request.filter {
            Some(filter) => Filter::compile(filter, mapping)?.render(&self.formatter),
            None => String::new(),
        };
        Ok(emit(
            StatementKind::Delete,
            format!("DELETE FROM {table} {where_sql}"),
        ))
    }

    /// Alias of [`advanced_remove`](Self::advanced_remove).
    pub fn advanced_delete(&self, request: &DeleteRequest) -> BuildResult<String> {
        self.advanced_remove(request)
    }

    // ==================== Read statements ====================

    /// `SELECT <cols> FROM <table> [WHERE a = ?][ ORDER BY][ LIMIT]`
    pub fn get(&self, request: &GetRequest) -> BuildResult<String> {
        let (mapping, table) = target(request.mapping.as_ref(), request.table_name.as_deref())?;
        let order = check_order(request.order.as_ref())?;
        let page = check_offset(request.offset.as_ref(), &self.config)?;

        let where_sql = match non_empty(request.filter.as_ref()) {
            Some(filter) => SimpleWhere::compile(filter, mapping)?.render(&self.formatter),
            None => String::new(),
        };

        let mut sql = format!(
            "SELECT {} FROM {table}",
            select_columns(request.select.as_ref(), mapping, &self.formatter)
        );
        push_where(&mut sql, &where_sql);
        if let Some(order) = order {
            order.write_to(&mut sql, &self.formatter);
        }
        if let Some(page) = page {
            let _ = write!(sql, " LIMIT {}, {}", page.offset, page.limit);
        }
        Ok(emit(StatementKind::Select, sql))
    }

    /// `SELECT <cols> FROM <table> [WHERE <filter>][ ORDER BY][ LIMIT]`,
    /// followed by `;SELECT COUNT(*) ...` over the same filter when a count
    /// alias is given.
    pub fn query(&self, request: &QueryRequest) -> BuildResult<String> {
        let (mapping, table) = target(request.mapping.as_ref(), request.table_name.as_deref())?;
        let order = check_order(request.order.as_ref())?;
        let page = check_offset(request.offset.as_ref(), &self.config)?;
        let count = check_count(request.count.as_ref())?;

        let where_sql = match non_empty(request.filter.as_ref()) {
            Some(filter) => Filter::compile(filter, mapping)?.render(&self.formatter),
            None => String::new(),
        };

        let mut sql = format!(
            "SELECT {} FROM {table}",
            select_columns(request.select.as_ref(), mapping, &self.formatter)
        );
        push_where(&mut sql, &where_sql);
        if let Some(order) = order {
            order.write_to(&mut sql, &self.formatter);
        }
        if let Some(page) = page {
            let _ = write!(sql, " LIMIT {}, {}", page.offset, page.limit);
        }
        if let Some(alias) = count {
            sql.push(';');
            sql.push_str(&self.count_sql(&alias, table, &where_sql));
        }
        Ok(emit(StatementKind::Select, sql))
    }

    /// `SELECT COUNT(*) AS <alias> FROM <table> [WHERE <filter>]`
    pub fn count(&self, request: &CountRequest) -> BuildResult<String> {
        let (mapping, table) = target(request.mapping.as_ref(), request.table_name.as_deref())?;
        let alias = check_count(request.alias.as_ref())?
            .ok_or(BuildError::MissingArgument(Argument::Count))?;

        let where_sql = match non_empty(request.filter.as_ref()) {
            Some(filter) => Filter::compile(filter, mapping)?.render(&self.formatter),
            None => String::new(),
        };
        Ok(emit(
            StatementKind::Count,
            self.count_sql(&alias, table, &where_sql),
        ))
    }

    fn count_sql(&self, alias: &str, table: &str, where_sql: &str) -> String {
        let mut sql = String::from("SELECT COUNT(*) AS ");
        self.formatter.write_identifier(&mut sql, alias);
        sql.push_str(" FROM ");
        sql.push_str(table);
        push_where(&mut sql, where_sql);
        sql
    }
}

/// Resolve the mapping and the validated table name.
fn target<'a>(
    mapping: Option<&'a Mapping>,
    table: Option<&'a str>,
) -> BuildResult<(&'a Mapping, &'a str)> {
    let mapping = require(mapping, Argument::Mapping)?;
    let table = table.ok_or(BuildError::MissingArgument(Argument::Table))?;
    Ok((mapping, validate_table(table)?))
}

fn update_args(request: &UpdateRequest) -> BuildResult<(&Record, &Record, &Mapping, &str)> {
    let data = require(request.data.as_ref(), Argument::Data)?;
    let filter = require(request.filter.as_ref(), Argument::Where)?;
    let (mapping, table) = target(request.mapping.as_ref(), request.table_name.as_deref())?;
    Ok((data, filter, mapping, table))
}

/// An empty where object reads as "no filter" for the select family.
fn non_empty(filter: Option<&Record>) -> Option<&Record> {
    filter.filter(|f| !f.is_empty())
}

fn push_where(sql: &mut String, where_sql: &str) {
    if !where_sql.is_empty() {
        sql.push(' ');
        sql.push_str(where_sql);
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn emit(kind: StatementKind, sql: String) -> String {
    #[cfg(feature = "tracing")]
    tracing::debug!(target: "mapsql.sql", statement = %kind, sql = %sql, "built statement");
    sql
}
