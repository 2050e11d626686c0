//! Field mappings: the declared logical type of every column.

use crate::value::Value;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Logical type tag of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Datetime,
    Point,
    Polygon,
}

impl FieldType {
    /// Whether a scalar value satisfies this type.
    ///
    /// - `string`: text
    /// - `number`: integers and finite floats
    /// - `datetime`: text or datetime values
    ///
    /// Geometric types never accept a scalar value.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::String => matches!(value, Value::Text(_)),
            FieldType::Number => value.is_numeric(),
            FieldType::Datetime => matches!(value, Value::Text(_) | Value::DateTime(_)),
            FieldType::Point | FieldType::Polygon => false,
        }
    }

    pub fn is_geometry(self) -> bool {
        matches!(self, FieldType::Point | FieldType::Polygon)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Datetime => "datetime",
            FieldType::Point => "point",
            FieldType::Polygon => "polygon",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema of a table: field name → [`FieldType`].
///
/// # Example
/// ```ignore
/// use mapsql::{FieldType, Mapping};
///
/// let mapping = Mapping::new()
///     .field("user_id", FieldType::Number)
///     .field("name", FieldType::String)
///     .field("location", FieldType::Point);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    fields: BTreeMap<String, FieldType>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field (chainable). Redeclaring a field replaces its type.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field_type: FieldType) {
        self.fields.insert(name.into(), field_type);
    }

    /// Declared type of `name`, if mapped.
    pub fn get(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldType)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, FieldType)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
