//! Request preconditions and shape checks for order / offset / count / select.
//!
//! Everything here runs before any clause is compiled, so a malformed request
//! never produces a partial statement.

use crate::config::{BuilderConfig, Page};
use crate::error::{Argument, BuildError, BuildResult};
use crate::format::SqlFormatter;
use crate::mapping::Mapping;
use crate::value::Value;

/// Fail with [`BuildError::MissingArgument`] when a required argument is absent.
pub(crate) fn require<T>(value: Option<&T>, argument: Argument) -> BuildResult<&T> {
    value.ok_or(BuildError::MissingArgument(argument))
}

/// Sort direction of an ORDER BY fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Desc)
        } else {
            None
        }
    }
}

/// A validated `{by, sort}` order spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub sort: Option<SortOrder>,
}

impl OrderBy {
    /// `` ORDER BY `field`[ SORT]`` with a leading space.
    pub fn write_to(&self, out: &mut String, formatter: &impl SqlFormatter) {
        out.push_str(" ORDER BY ");
        formatter.write_identifier(out, &self.field);
        if let Some(sort) = self.sort {
            out.push(' ');
            out.push_str(sort.as_sql());
        }
    }
}

/// Validate an order spec. A spec without `by` yields no ORDER BY.
pub fn check_order(order: Option<&Value>) -> BuildResult<Option<OrderBy>> {
    let Some(order) = order.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let Value::Map(spec) = order else {
        return Err(BuildError::invalid_shape("order must be an object of {by, sort}"));
    };

    let field = match spec.get("by") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Text(by)) if !by.is_empty() => by.clone(),
        Some(_) => {
            return Err(BuildError::invalid_shape(
                "order by value has to be a non-empty string",
            ));
        }
    };

    let sort = match spec.get("sort") {
        None | Some(Value::Null) => None,
        Some(Value::Text(s)) => Some(SortOrder::parse(s).ok_or_else(sort_error)?),
        Some(_) => return Err(sort_error()),
    };

    Ok(Some(OrderBy { field, sort }))
}

fn sort_error() -> BuildError {
    BuildError::invalid_shape("order sort value has to be ASC or DESC")
}

/// Validate an `[index, limit]` offset spec according to the configured policy.
pub fn check_offset(offset: Option<&Value>, config: &BuilderConfig) -> BuildResult<Option<Page>> {
    let Some(offset) = offset.filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    if config.is_lenient() {
        let page = match offset.as_list() {
            Some([index, limit]) => lenient_int(index).zip(lenient_int(limit)),
            _ => None,
        };
        return Ok(page
            .map(|(offset, limit)| Page::new(offset, limit))
            .or(config.fallback_page));
    }

    let Value::List(items) = offset else {
        return Err(BuildError::invalid_shape("offset must be an array"));
    };
    let [index, limit] = items.as_slice() else {
        return Err(BuildError::invalid_shape(
            "offset must be an array of [index,limit]",
        ));
    };
    let index = strict_int(index)
        .ok_or_else(|| BuildError::invalid_shape("index value has to be a number"))?;
    let limit = strict_int(limit)
        .ok_or_else(|| BuildError::invalid_shape("limit value has to be a number"))?;

    Ok(Some(Page::new(index, limit)))
}

fn strict_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        _ => None,
    }
}

/// Integer coercion of the lenient policy: numbers truncate, text is read
/// up to the end of its leading digits.
fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Text(s) => {
            let s = s.trim_start();
            let sign = usize::from(s.starts_with(['+', '-']));
            let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return None;
            }
            s[..sign + digits].parse().ok()
        }
        other => strict_int(other),
    }
}

/// Validate a count alias: a non-blank string.
pub fn check_count(count: Option<&Value>) -> BuildResult<Option<String>> {
    match count {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Text(alias)) if !alias.trim().is_empty() => Ok(Some(alias.clone())),
        Some(Value::Text(_)) => Err(BuildError::invalid_shape(
            "count value has to be a non-empty string",
        )),
        Some(_) => Err(BuildError::invalid_shape("count value has to be a string")),
    }
}

/// Render the select list: mapped names only, `*` when none remain.
pub fn select_columns(select: Option<&Value>, mapping: &Mapping, formatter: &impl SqlFormatter) -> String {
    let Some(Value::List(names)) = select else {
        return "*".to_string();
    };

    let mut out = String::new();
    for name in names
        .iter()
        .filter_map(Value::as_text)
        .filter(|name| mapping.contains(name))
    {
        if !out.is_empty() {
            out.push_str(", ");
        }
        formatter.write_identifier(&mut out, name);
    }

    if out.is_empty() {
        out.push('*');
    }
    out
}
