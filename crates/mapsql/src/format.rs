//! Literal escaping and placeholder formatting.
//!
//! This is the one dialect-specific trust boundary of the crate: every value
//! and identifier that reaches the generated SQL passes through a
//! [`SqlFormatter`]. The default [`MysqlFormatter`] follows MySQL quoting rules.
//!
//! `format` understands two placeholders:
//!
//! - `?`: a value (escaped and quoted per its kind), or an assignment list
//! - `??`: an identifier (back-tick quoted)
//!
//! # Example
//! ```ignore
//! use mapsql::format::{Arg, MysqlFormatter, SqlFormatter};
//! use mapsql::Value;
//!
//! let f = MysqlFormatter;
//! let sql = f.format("?? > ?", &[Arg::Ident("age"), Arg::Value(&Value::Int(18))]);
//! assert_eq!(sql, "`age` > 18");
//! ```

use crate::value::{DATETIME_FORMAT, Value};
use std::fmt::Write as _;

/// A placeholder argument for [`SqlFormatter::format`].
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    /// Escaped literal.
    Value(&'a Value),
    /// Back-tick quoted identifier.
    Ident(&'a str),
    /// `` `a` = 1, `b` = 'x' `` assignment list.
    Assignments(&'a [(String, Value)]),
}

/// Escaping primitive consumed by the statement builder.
///
/// Implementors only need [`write_value`](SqlFormatter::write_value) and
/// [`write_identifier`](SqlFormatter::write_identifier); the rest is derived.
pub trait SqlFormatter {
    /// Render a value as a SQL literal.
    fn write_value(&self, out: &mut String, value: &Value);

    /// Render a quoted identifier.
    fn write_identifier(&self, out: &mut String, name: &str);

    /// Render `` `name` = value `` pairs separated by `, `.
    fn write_assignments(&self, out: &mut String, pairs: &[(String, Value)]) {
        for (i, (name, value)) in pairs.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_identifier(out, name);
            out.push_str(" = ");
            self.write_value(out, value);
        }
    }

    fn escape(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_value(&mut out, value);
        out
    }

    fn escape_id(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_identifier(&mut out, name);
        out
    }

    /// Substitute `?` / `??` placeholders left to right.
    ///
    /// Placeholders beyond the supplied arguments are kept verbatim.
    fn format(&self, template: &str, args: &[Arg<'_>]) -> String {
        let mut out = String::with_capacity(template.len() + args.len() * 8);
        let mut args = args.iter();
        let mut rest = template;

        while let Some(pos) = rest.find('?') {
            out.push_str(&rest[..pos]);
            let is_ident = rest[pos + 1..].starts_with('?');
            let width = if is_ident { 2 } else { 1 };

            match args.next() {
                Some(arg) if is_ident => match arg {
                    Arg::Ident(name) => self.write_identifier(&mut out, name),
                    Arg::Value(Value::Text(name)) => self.write_identifier(&mut out, name),
                    Arg::Value(other) => self.write_identifier(&mut out, &other.to_string()),
                    Arg::Assignments(pairs) => self.write_assignments(&mut out, pairs),
                },
                Some(arg) => match arg {
                    Arg::Value(value) => self.write_value(&mut out, value),
                    Arg::Ident(name) => self.write_identifier(&mut out, name),
                    Arg::Assignments(pairs) => self.write_assignments(&mut out, pairs),
                },
                None => out.push_str(&rest[pos..pos + width]),
            }
            rest = &rest[pos + width..];
        }
        out.push_str(rest);
        out
    }
}

/// MySQL literal and identifier quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlFormatter;

impl MysqlFormatter {
    fn write_string(out: &mut String, s: &str) {
        out.push('\'');
        for c in s.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\u{8}' => out.push_str("\\b"),
                '\t' => out.push_str("\\t"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\u{1a}' => out.push_str("\\Z"),
                '"' => out.push_str("\\\""),
                '\'' => out.push_str("\\'"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out.push('\'');
    }
}

impl SqlFormatter for MysqlFormatter {
    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::Null => out.push_str("NULL"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => {
                let _ = write!(out, "{i}");
            }
            Value::Float(f) if f.is_finite() => {
                let _ = write!(out, "{f}");
            }
            Value::Float(_) => out.push_str("NULL"),
            Value::Text(s) => Self::write_string(out, s),
            Value::DateTime(dt) => {
                let _ = write!(out, "'{}'", dt.format(DATETIME_FORMAT));
            }
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if let Value::List(_) = item {
                        out.push('(');
                        self.write_value(out, item);
                        out.push(')');
                    } else {
                        self.write_value(out, item);
                    }
                }
            }
            Value::Map(record) => {
                for (i, (name, item)) in record.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_identifier(out, name);
                    out.push_str(" = ");
                    self.write_value(out, item);
                }
            }
        }
    }

    fn write_identifier(&self, out: &mut String, name: &str) {
        out.push('`');
        for c in name.chars() {
            match c {
                '`' => out.push_str("``"),
                '.' => out.push_str("`.`"),
                _ => out.push(c),
            }
        }
        out.push('`');
    }
}

/// Normalize a string value before it is bound.
///
/// Backslash, single quote, double quote and NUL are backslash-escaped, and
/// every newline variant (`\r\n`, `\n\r`, `\r`, `\n`) becomes a single `\n`.
pub fn format_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push('\n');
            }
            '\n' => {
                chars.next_if_eq(&'\r');
                out.push('\n');
            }
            _ => out.push(c),
        }
    }
    out
}
