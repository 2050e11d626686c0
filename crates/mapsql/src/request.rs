//! Request records, one per operation.
//!
//! Every field is optional: an absent field behaves like a null argument and
//! is reported by the operation that requires it. All records deserialize
//! from JSON using the field names `data`, `where`, `mapping`, `tableName`,
//! `select`, `order`, `offset`, `count` and `as`.
//!
//! # Example
//! ```ignore
//! use mapsql::{record, FieldType, InsertRequest, Mapping};
//!
//! let request = InsertRequest::new("users", Mapping::new().field("id", FieldType::Number))
//!     .with_data(record! { "id" => 1 });
//! ```

use crate::mapping::Mapping;
use crate::value::{Record, Value};
use serde::Deserialize;

/// `insert` / `replace` arguments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsertRequest {
    pub data: Option<Record>,
    pub mapping: Option<Mapping>,
    #[serde(rename = "tableName", alias = "table_name")]
    pub table_name: Option<String>,
}

impl InsertRequest {
    pub fn new(table_name: impl Into<String>, mapping: Mapping) -> Self {
        Self {
            data: None,
            mapping: Some(mapping),
            table_name: Some(table_name.into()),
        }
    }

    pub fn with_data(mut self, data: Record) -> Self {
        self.data = Some(data);
        self
    }
}

/// `update` / `advanced_update` arguments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub data: Option<Record>,
    #[serde(rename = "where")]
    pub filter: Option<Record>,
    pub mapping: Option<Mapping>,
    #[serde(rename = "tableName", alias = "table_name")]
    pub table_name: Option<String>,
}

impl UpdateRequest {
    pub fn new(table_name: impl Into<String>, mapping: Mapping) -> Self {
        Self {
            data: None,
            filter: None,
            mapping: Some(mapping),
            table_name: Some(table_name.into()),
        }
    }

    pub fn with_data(mut self, data: Record) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_where(mut self, filter: Record) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// `remove` / `advanced_remove` arguments. Without a where object every row
/// of the table is targeted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeleteRequest {
    #[serde(rename = "where")]
    pub filter: Option<Record>,
    pub mapping: Option<Mapping>,
    #[serde(rename = "tableName", alias = "table_name")]
    pub table_name: Option<String>,
}

impl DeleteRequest {
    pub fn new(table_name: impl Into<String>, mapping: Mapping) -> Self {
        Self {
            filter: None,
            mapping: Some(mapping),
            table_name: Some(table_name.into()),
        }
    }

    pub fn with_where(mut self, filter: Record) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// `get` arguments: simple where plus select / order / offset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GetRequest {
    pub select: Option<Value>,
    #[serde(rename = "where")]
    pub filter: Option<Record>,
    pub mapping: Option<Mapping>,
    #[serde(rename = "tableName", alias = "table_name")]
    pub table_name: Option<String>,
    pub order: Option<Value>,
    pub offset: Option<Value>,
}

impl GetRequest {
    pub fn new(table_name: impl Into<String>, mapping: Mapping) -> Self {
        Self {
            mapping: Some(mapping),
            table_name: Some(table_name.into()),
            ..Self::default()
        }
    }

    pub fn with_select(mut self, select: impl Into<Value>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn with_where(mut self, filter: Record) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order(mut self, order: impl Into<Value>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_offset(mut self, offset: impl Into<Value>) -> Self {
        self.offset = Some(offset.into());
        self
    }
}

/// `query` arguments: advanced where, select / order / offset and an
/// optional count alias.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    pub select: Option<Value>,
    #[serde(rename = "where")]
    pub filter: Option<Record>,
    pub mapping: Option<Mapping>,
    #[serde(rename = "tableName", alias = "table_name")]
    pub table_name: Option<String>,
    pub order: Option<Value>,
    pub offset: Option<Value>,
    pub count: Option<Value>,
}

impl QueryRequest {
    pub fn new(table_name: impl Into<String>, mapping: Mapping) -> Self {
        Self {
            mapping: Some(mapping),
            table_name: Some(table_name.into()),
            ..Self::default()
        }
    }

    pub fn with_select(mut self, select: impl Into<Value>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn with_where(mut self, filter: Record) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order(mut self, order: impl Into<Value>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_offset(mut self, offset: impl Into<Value>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    pub fn with_count(mut self, alias: impl Into<Value>) -> Self {
        self.count = Some(alias.into());
        self
    }
}

/// `count` arguments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CountRequest {
    #[serde(rename = "as", alias = "count")]
    pub alias: Option<Value>,
    #[serde(rename = "where")]
    pub filter: Option<Record>,
    pub mapping: Option<Mapping>,
    #[serde(rename = "tableName", alias = "table_name")]
    pub table_name: Option<String>,
}

impl CountRequest {
    pub fn new(table_name: impl Into<String>, mapping: Mapping) -> Self {
        Self {
            mapping: Some(mapping),
            table_name: Some(table_name.into()),
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<Value>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_where(mut self, filter: Record) -> Self {
        self.filter = Some(filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FieldType;

    #[test]
    fn deserializes_wire_names() {
        let request: QueryRequest = serde_json::from_str(
            r#"{
                "select": ["id"],
                "where": {"and": {"id": {">": 1}}},
                "mapping": {"id": "number"},
                "tableName": "users",
                "offset": [0, 10],
                "count": "total"
            }"#,
        )
        .unwrap();

        assert_eq!(request.table_name.as_deref(), Some("users"));
        assert_eq!(request.mapping.unwrap().get("id"), Some(FieldType::Number));
        assert_eq!(request.count, Some(Value::from("total")));
        assert_eq!(request.offset, Some(Value::from(vec![0, 10])));
        let filter = request.filter.unwrap();
        assert_eq!(filter.keys().collect::<Vec<_>>(), vec!["and"]);
    }

    #[test]
    fn null_and_missing_fields_are_absent() {
        let request: UpdateRequest =
            serde_json::from_str(r#"{"data": null, "table_name": "t"}"#).unwrap();
        assert_eq!(request.data, None);
        assert_eq!(request.filter, None);
        assert_eq!(request.table_name.as_deref(), Some("t"));
    }

    #[test]
    fn count_accepts_as_or_count() {
        let a: CountRequest = serde_json::from_str(r#"{"as": "c"}"#).unwrap();
        let b: CountRequest = serde_json::from_str(r#"{"count": "c"}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn builders_fill_fields() {
        let request = GetRequest::new("users", Mapping::new())
            .with_select(vec!["id"])
            .with_offset(vec![0, 5]);
        assert_eq!(request.table_name.as_deref(), Some("users"));
        assert!(request.filter.is_none());
        assert_eq!(request.offset, Some(Value::from(vec![0, 5])));
    }
}
