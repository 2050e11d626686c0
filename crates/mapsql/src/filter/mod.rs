//! WHERE clause compilation.
//!
//! Two independent compilers, both hard-validating values against the mapping:
//!
//! - [`SimpleWhere`]: an equality-only map, every entry AND-ed. Any unmapped,
//!   null or mistyped entry is an error.
//! - [`Filter`]: `{ "and": {..}, "or": {..} }` groups whose entries are either
//!   scalars (equality) or operator objects (`>`, `<`, `>=`, `<=`, `in`,
//!   `not in`). Unmapped and null entries are skipped.
//!
//! When both groups are present the rendered clause is the plain textual
//! concatenation `<and clauses> OR <or clauses>`, without parentheses.

use crate::error::{BuildError, BuildResult};
use crate::format::{Arg, SqlFormatter, format_string};
use crate::mapping::{FieldType, Mapping};
use crate::value::{Record, Value};

#[cfg(test)]
mod tests;

// ==================== Simple where ====================

/// Equality-only WHERE clause with its bound parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleWhere {
    params: Vec<(String, Value)>,
}

impl SimpleWhere {
    /// Validate every entry of `filter` and collect it as a parameter.
    pub fn compile(filter: &Record, mapping: &Mapping) -> BuildResult<Self> {
        let mut params = Vec::with_capacity(filter.len());

        for (name, value) in filter.iter() {
            let Some(field_type) = mapping.get(name) else {
                return Err(BuildError::invalid_where(name, value));
            };
            let bound = match (field_type, value) {
                (FieldType::String, Value::Text(s)) => Value::Text(format_string(s)),
                (FieldType::Number | FieldType::Datetime, v) if field_type.accepts(v) => v.clone(),
                _ => return Err(BuildError::invalid_where(name, value)),
            };
            params.push((name.to_string(), bound));
        }

        Ok(Self { params })
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Ordered `(field, value)` parameters.
    pub fn params(&self) -> &[(String, Value)] {
        &self.params
    }

    /// `WHERE ? AND ? ...`, one placeholder per parameter; empty when there are none.
    pub fn template(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        format!("WHERE {}", vec!["?"; self.params.len()].join(" AND "))
    }

    /// Render the clause with each placeholder expanded to `` `field` = value ``.
    pub fn render(&self, formatter: &impl SqlFormatter) -> String {
        let args: Vec<Arg<'_>> = self
            .params
            .iter()
            .map(|pair| Arg::Assignments(std::slice::from_ref(pair)))
            .collect();
        formatter.format(&self.template(), &args)
    }
}

// ==================== Advanced filter ====================

/// Comparison operator of a [`Clause::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }
}

/// One compiled condition on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `` `field` <op> value ``
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    /// `` `field` IN(v1,v2) `` or `` `field` NOT IN(v1,v2) ``
    InList {
        field: String,
        values: Vec<Value>,
        negated: bool,
    },
}

impl Clause {
    pub fn field(&self) -> &str {
        match self {
            Clause::Compare { field, .. } | Clause::InList { field, .. } => field,
        }
    }

    pub fn render(&self, formatter: &impl SqlFormatter) -> String {
        match self {
            Clause::Compare { field, op, value } => formatter.format(
                &format!("?? {} ?", op.as_sql()),
                &[Arg::Ident(field), Arg::Value(value)],
            ),
            Clause::InList {
                values, negated, ..
            } if values.is_empty() => {
                // empty list: IN never matches, NOT IN always does
                let always = if *negated { "1=1" } else { "1=0" };
                always.to_string()
            }
            Clause::InList {
                field,
                values,
                negated,
            } => {
                let keyword = if *negated { "NOT IN" } else { "IN" };
                let template = format!("?? {keyword}({})", vec!["?"; values.len()].join(","));
                let mut args = Vec::with_capacity(values.len() + 1);
                args.push(Arg::Ident(field));
                args.extend(values.iter().map(Arg::Value));
                formatter.format(&template, &args)
            }
        }
    }
}

/// Compiled `and` / `or` filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    and: Vec<Clause>,
    or: Vec<Clause>,
}

impl Filter {
    /// Compile an advanced where object.
    ///
    /// At least one of `and` / `or` must be a non-empty object, otherwise
    /// [`BuildError::MissingFilterGroup`] is returned.
    pub fn compile(filter: &Record, mapping: &Mapping) -> BuildResult<Self> {
        let and = group(filter, "and");
        let or = group(filter, "or");
        if and.is_none() && or.is_none() {
            return Err(BuildError::MissingFilterGroup);
        }

        Ok(Self {
            and: and.map_or(Ok(Vec::new()), |g| compile_group(g, mapping))?,
            or: or.map_or(Ok(Vec::new()), |g| compile_group(g, mapping))?,
        })
    }

    pub fn and_clauses(&self) -> &[Clause] {
        &self.and
    }

    pub fn or_clauses(&self) -> &[Clause] {
        &self.or
    }

    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty()
    }

    /// Render `WHERE <and> OR <or>`; empty when no clause survived compilation.
    pub fn render(&self, formatter: &impl SqlFormatter) -> String {
        let join = |clauses: &[Clause], sep: &str| {
            clauses
                .iter()
                .map(|c| c.render(formatter))
                .collect::<Vec<_>>()
                .join(sep)
        };

        let body = match (self.and.is_empty(), self.or.is_empty()) {
            (true, true) => return String::new(),
            (false, true) => join(&self.and, " AND "),
            (true, false) => join(&self.or, " OR "),
            (false, false) => format!("{} OR {}", join(&self.and, " AND "), join(&self.or, " OR ")),
        };
        format!("WHERE {body}")
    }
}

fn group<'a>(filter: &'a Record, key: &str) -> Option<&'a Record> {
    filter
        .get(key)
        .and_then(Value::as_map)
        .filter(|g| !g.is_empty())
}

fn compile_group(group: &Record, mapping: &Mapping) -> BuildResult<Vec<Clause>> {
    let mut clauses = Vec::new();

    for (name, value) in group.iter() {
        let Some(field_type) = mapping.get(name) else {
            continue;
        };
        match value {
            Value::Null => continue,
            Value::Map(ops) => compile_operators(name, field_type, ops, &mut clauses)?,
            scalar => clauses.push(Clause::Compare {
                field: name.to_string(),
                op: CompareOp::Eq,
                value: checked(name, field_type, scalar)?,
            }),
        }
    }

    Ok(clauses)
}

fn compile_operators(
    name: &str,
    field_type: FieldType,
    ops: &Record,
    clauses: &mut Vec<Clause>,
) -> BuildResult<()> {
    for (key, operand) in ops.iter() {
        let op = match key {
            ">" => CompareOp::Gt,
            "<" => CompareOp::Lt,
            ">=" => CompareOp::Gte,
            "<=" => CompareOp::Lte,
            "in" | "not in" => {
                let Value::List(items) = operand else {
                    return Err(BuildError::invalid_where(name, operand));
                };
                clauses.push(Clause::InList {
                    field: name.to_string(),
                    values: items
                        .iter()
                        .filter(|v| field_type.accepts(v))
                        .cloned()
                        .collect(),
                    negated: key == "not in",
                });
                continue;
            }
            _unknown => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    target: "mapsql.filter",
                    field = name,
                    operator = _unknown,
                    "ignoring unrecognized operator"
                );
                continue;
            }
        };

        clauses.push(Clause::Compare {
            field: name.to_string(),
            op,
            value: checked(name, field_type, operand)?,
        });
    }
    Ok(())
}

fn checked(name: &str, field_type: FieldType, value: &Value) -> BuildResult<Value> {
    if field_type.accepts(value) {
        Ok(value.clone())
    } else {
        Err(BuildError::invalid_where(name, value))
    }
}
