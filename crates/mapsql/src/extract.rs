//! Type-checked extraction of data objects into `SET` material.
//!
//! Unlike where compilation, extraction never rejects a scalar: unmapped
//! fields, null values and values that do not match the declared type are
//! dropped silently. Only malformed geometry raises an error.

use crate::error::BuildResult;
use crate::format::{SqlFormatter, format_string};
use crate::geometry;
use crate::mapping::{FieldType, Mapping};
use crate::value::{Record, Value};

/// Accepted fields of a data object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    /// Scalar assignments, in data object order, bound as literals.
    pub assignments: Vec<(String, Value)>,
    /// `name = POINT(x,y),` fragments.
    pub points: Vec<String>,
    /// `name = ST_GeomFromText('POLYGON(...)'),` fragments.
    pub polygons: Vec<String>,
}

impl Extracted {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.points.is_empty() && self.polygons.is_empty()
    }

    /// Render the body of a `SET` clause.
    ///
    /// Geometry fragments come first (points, then polygons) followed by the
    /// scalar assignments. The trailing `,` of the last geometry fragment is
    /// dropped when no scalar assignment follows.
    pub fn render_set(&self, formatter: &impl SqlFormatter) -> String {
        let mut out: String = self.points.iter().chain(&self.polygons).map(String::as_str).collect();
        if self.assignments.is_empty() {
            if out.ends_with(',') {
                out.pop();
            }
        } else {
            formatter.write_assignments(&mut out, &self.assignments);
        }
        out
    }
}

/// Walk `data` against `mapping`, keeping only fields that satisfy their type.
pub fn extract_data(data: &Record, mapping: &Mapping) -> BuildResult<Extracted> {
    let mut out = Extracted::default();

    for (name, value) in data.iter() {
        let Some(field_type) = mapping.get(name) else {
            dropped(name, value, "unmapped");
            continue;
        };
        if value.is_null() {
            continue;
        }

        match field_type {
            FieldType::String => match value {
                Value::Text(s) => out
                    .assignments
                    .push((name.to_string(), Value::Text(format_string(s)))),
                _ => dropped(name, value, "not text"),
            },
            FieldType::Number | FieldType::Datetime => {
                if field_type.accepts(value) {
                    out.assignments.push((name.to_string(), value.clone()));
                } else {
                    dropped(name, value, "type mismatch");
                }
            }
            FieldType::Point => {
                if let Some(fragment) = geometry::point(name, value)? {
                    out.points.push(fragment);
                }
            }
            FieldType::Polygon => {
                if let Some(fragment) = geometry::polygon(name, value)? {
                    out.polygons.push(fragment);
                }
            }
        }
    }

    Ok(out)
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn dropped(name: &str, value: &Value, reason: &'static str) {
    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "mapsql.extract",
        field = name,
        kind = value.kind(),
        reason,
        "dropping data field"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::MysqlFormatter;
    use crate::record;

    fn mapping() -> Mapping {
        Mapping::new()
            .field("user_id", FieldType::Number)
            .field("create_time", FieldType::Datetime)
            .field("name", FieldType::String)
            .field("phone", FieldType::Number)
            .field("location", FieldType::Point)
            .field("borders", FieldType::Polygon)
    }

    #[test]
    fn drops_unmapped_null_and_mismatched() {
        let data = record! {
            "user_id" => 123,
            "name" => record! { "nested" => true },
            "phone" => "123",
            "unknown" => "x",
            "create_time" => Value::Null,
        };
        let out = extract_data(&data, &mapping()).unwrap();
        assert_eq!(out.assignments, vec![("user_id".to_string(), Value::Int(123))]);
        assert!(out.points.is_empty());
    }

    #[test]
    fn strings_go_through_scalar_formatter() {
        let data = record! { "name" => "O'Brien\r\n" };
        let out = extract_data(&data, &mapping()).unwrap();
        assert_eq!(
            out.assignments,
            vec![("name".to_string(), Value::from("O\\'Brien\n"))]
        );
    }

    #[test]
    fn geometry_fragments_are_collected_in_order() {
        let data = record! {
            "borders" => vec![record! { "x" => 1, "y" => 2 }],
            "location" => record! { "x" => 3, "y" => 4 },
        };
        let out = extract_data(&data, &mapping()).unwrap();
        assert_eq!(out.points, vec!["location = POINT(3,4),"]);
        assert_eq!(out.polygons, vec!["borders = ST_GeomFromText('POLYGON(1  2)'),"]);
    }

    #[test]
    fn render_set_strips_dangling_comma() {
        let data = record! { "location" => record! { "x" => 3, "y" => 4 } };
        let out = extract_data(&data, &mapping()).unwrap();
        assert_eq!(out.render_set(&MysqlFormatter), "location = POINT(3,4)");
    }

    #[test]
    fn render_set_joins_geometry_and_scalars() {
        let data = record! {
            "location" => record! { "x" => 3, "y" => 4 },
            "borders" => vec![record! { "x" => 1, "y" => 2 }],
            "user_id" => 7,
        };
        let out = extract_data(&data, &mapping()).unwrap();
        assert_eq!(
            out.render_set(&MysqlFormatter),
            "location = POINT(3,4),borders = ST_GeomFromText('POLYGON(1  2)'),`user_id` = 7"
        );
    }

    #[test]
    fn bad_polygon_is_an_error() {
        let data = record! { "borders" => "nope" };
        assert!(extract_data(&data, &mapping()).unwrap_err().is_geometry());
    }
}
