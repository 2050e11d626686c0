//! Runtime values carried by data and where objects.
//!
//! [`Value`] is a tagged union that records the parsed kind of every input,
//! so type checks against a [`FieldType`](crate::FieldType) are plain enum
//! matches. [`Record`] is an insertion-ordered map of field name to value;
//! assignment and clause order in the generated SQL follows it.
//!
//! # Example
//! ```ignore
//! use mapsql::{record, Value};
//!
//! let data = record! {
//!     "user_id" => 123,
//!     "name" => "Harry Potter",
//!     "location" => record! { "x" => 12.33, "y" => 12.22 },
//!     "deleted_at" => Value::Null,
//! };
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// Datetime rendering shared by literals and error messages.
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A runtime value supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null or absent.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
    Map(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric values (`Int` or a finite `Float`).
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Record> {
        match self {
            Value::Map(record) => Some(record),
            _ => None,
        }
    }

    /// Short kind name, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Map(record) => {
                f.write_str("{")?;
                for (i, (key, value)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// An insertion-ordered map of field name to [`Value`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a value, replacing (in place) any previous value of `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Chainable insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Build a [`Record`] from `key => value` pairs.
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $( record.insert($key, $value); )+
        record
    }};
}

// ==================== Conversions ====================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.naive_utc())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::from(items),
            serde_json::Value::Object(map) => Value::Map(map.into_iter().collect()),
        }
    }
}

#[cfg(feature = "geo_types")]
mod geo {
    use super::{Record, Value};

    impl From<geo_types::Coord<f64>> for Value {
        fn from(c: geo_types::Coord<f64>) -> Self {
            Value::Map(Record::new().with("x", c.x).with("y", c.y))
        }
    }

    impl From<geo_types::Point<f64>> for Value {
        fn from(p: geo_types::Point<f64>) -> Self {
            Value::from(p.0)
        }
    }

    impl From<geo_types::LineString<f64>> for Value {
        fn from(line: geo_types::LineString<f64>) -> Self {
            Value::List(line.0.into_iter().map(Value::from).collect())
        }
    }

    /// Only the exterior ring is kept; interior rings have no literal form here.
    impl From<geo_types::Polygon<f64>> for Value {
        fn from(polygon: geo_types::Polygon<f64>) -> Self {
            let (exterior, _) = polygon.into_inner();
            Value::from(exterior)
        }
    }
}

// ==================== Deserialization ====================

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-like value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut record = Record::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            record.insert(key, value);
        }
        Ok(Value::Map(record))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Map(record) => Ok(record),
            other => Err(de::Error::custom(format!(
                "expected an object, got {}",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_insertion_order() {
        let r = record! { "b" => 1, "a" => 2, "c" => 3 };
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn record_insert_replaces_in_place() {
        let mut r = record! { "a" => 1, "b" => 2 };
        assert_eq!(r.insert("a", 10), Some(Value::Int(1)));
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(r.get("a"), Some(&Value::Int(10)));
    }

    #[test]
    fn deserialize_preserves_object_order() {
        let v: Value = serde_json::from_str(r#"{"z": 1, "a": [1.5, "x", null], "m": {"y": true}}"#)
            .unwrap();
        let r = v.as_map().unwrap();
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(
            r.get("a"),
            Some(&Value::List(vec![
                Value::Float(1.5),
                Value::Text("x".into()),
                Value::Null
            ]))
        );
    }

    #[test]
    fn record_rejects_non_object() {
        assert!(serde_json::from_str::<Record>("[1, 2]").is_err());
    }

    #[test]
    fn display_renders_error_friendly_text() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Float(12.33).to_string(), "12.33");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "1,2");
        assert_eq!(
            Value::from(record! { "x" => 1, "y" => "a" }).to_string(),
            "{x: 1, y: a}"
        );
    }

    #[cfg(feature = "geo_types")]
    #[test]
    fn geo_types_feed_geometry_compiler() {
        let point = Value::from(geo_types::Point::new(1.5, 2.0));
        assert_eq!(
            crate::geometry::point("p", &point).unwrap().as_deref(),
            Some("p = POINT(1.5,2),")
        );

        let ring = geo_types::LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        let polygon = Value::from(geo_types::Polygon::new(ring, vec![]));
        assert_eq!(
            crate::geometry::polygon("b", &polygon).unwrap().as_deref(),
            Some("b = ST_GeomFromText('POLYGON(0  0,1  0,0  0)'),")
        );
    }

    #[test]
    fn numeric_excludes_non_finite() {
        assert!(Value::Int(1).is_numeric());
        assert!(Value::Float(0.5).is_numeric());
        assert!(!Value::Float(f64::NAN).is_numeric());
        assert!(!Value::Text("1".into()).is_numeric());
    }
}
