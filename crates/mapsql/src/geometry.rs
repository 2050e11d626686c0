//! Point and polygon literal compilation.
//!
//! Fragments carry a trailing `,` so they can be concatenated ahead of the
//! scalar assignments of a `SET` clause:
//!
//! - point: `location = POINT(12.33,12.22),`
//! - polygon: `borders = ST_GeomFromText('POLYGON(12.33  12.22,13.33  13.22)'),`

use crate::error::{Axis, BuildError, BuildResult};
use crate::value::Value;

/// Compile a point field.
///
/// Returns `Ok(None)` when the value is null, not an object, or lacks an
/// `x` or `y` key.
pub fn point(name: &str, value: &Value) -> BuildResult<Option<String>> {
    Ok(coordinates(name, value)?.map(|(x, y)| format!("{name} = POINT({x},{y}),")))
}

/// Compile a polygon field from a sequence of `{x, y}` objects.
///
/// Elements without coordinates are skipped; a non-sequence value is an error.
pub fn polygon(name: &str, value: &Value) -> BuildResult<Option<String>> {
    let points = match value {
        Value::Null => return Ok(None),
        Value::List(points) => points,
        _ => {
            return Err(BuildError::InvalidPolygon {
                field: name.to_string(),
            });
        }
    };

    let mut pairs = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if let Some((x, y)) = coordinates(&format!("{name}[{i}]"), p)? {
            pairs.push(format!("{x}  {y}"));
        }
    }

    Ok(Some(format!(
        "{name} = ST_GeomFromText('POLYGON({})'),",
        pairs.join(",")
    )))
}

/// Read and validate the `x` / `y` pair of a point object (x first).
fn coordinates(name: &str, value: &Value) -> BuildResult<Option<(f64, f64)>> {
    let Value::Map(record) = value else {
        return Ok(None);
    };
    let (Some(raw_x), Some(raw_y)) = (record.get("x"), record.get("y")) else {
        return Ok(None);
    };

    let x = parse_coordinate(raw_x).ok_or_else(|| BuildError::invalid_coordinate(name, Axis::X, raw_x))?;
    let y = parse_coordinate(raw_y).ok_or_else(|| BuildError::invalid_coordinate(name, Axis::Y, raw_y))?;
    Ok(Some((x, y)))
}

/// Coerce a coordinate to a finite number.
///
/// Numbers pass through; text is read up to the end of its leading numeric
/// prefix (`"12.5deg"` → `12.5`). Anything else is rejected.
pub(crate) fn parse_coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Text(s) => parse_float_prefix(s),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_in = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_in(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_in(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits_in(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn point_renders_fragment() {
        let v = Value::from(record! { "y" => 12.22, "x" => 12.33 });
        assert_eq!(
            point("location", &v).unwrap().as_deref(),
            Some("location = POINT(12.33,12.22),")
        );
    }

    #[test]
    fn point_accepts_numeric_text() {
        let v = Value::from(record! { "x" => "1.5", "y" => " -2e1abc" });
        assert_eq!(
            point("p", &v).unwrap().as_deref(),
            Some("p = POINT(1.5,-20),")
        );
    }

    #[test]
    fn point_without_both_keys_is_empty() {
        let v = Value::from(record! { "x" => 1 });
        assert_eq!(point("p", &v).unwrap(), None);
        assert_eq!(point("p", &Value::Int(5)).unwrap(), None);
        assert_eq!(point("p", &Value::Null).unwrap(), None);
    }

    #[test]
    fn point_reports_x_before_y() {
        let v = Value::from(record! { "x" => "abc", "y" => "def" });
        let err = point("location", &v).unwrap_err();
        assert_eq!(err.to_string(), "Invalid X value of location: abc");

        let v = Value::from(record! { "x" => 1, "y" => "def" });
        let err = point("location", &v).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Y value of location: def");
    }

    #[test]
    fn point_rejects_null_coordinate() {
        let v = Value::from(record! { "x" => Value::Null, "y" => 1 });
        assert!(point("p", &v).unwrap_err().is_geometry());
    }

    #[test]
    fn polygon_renders_pairs_with_two_spaces() {
        let v = Value::from(vec![
            record! { "x" => 12.33, "y" => 12.22 },
            record! { "x" => 13.33, "y" => 13.22 },
        ]);
        assert_eq!(
            polygon("borders", &v).unwrap().as_deref(),
            Some("borders = ST_GeomFromText('POLYGON(12.33  12.22,13.33  13.22)'),")
        );
    }

    #[test]
    fn polygon_names_bad_index() {
        let v = Value::from(vec![
            record! { "x" => 12.33, "y" => 12.22 },
            record! { "x" => "north", "y" => 13.22 },
        ]);
        let err = polygon("borders", &v).unwrap_err();
        assert_eq!(err.to_string(), "Invalid X value of borders[1]: north");
    }

    #[test]
    fn polygon_rejects_non_sequence() {
        let err = polygon("borders", &Value::from("POLYGON()")).unwrap_err();
        assert_eq!(err, BuildError::InvalidPolygon { field: "borders".into() });
    }

    #[test]
    fn parse_float_prefix_follows_leading_number() {
        assert_eq!(parse_float_prefix("12.5deg"), Some(12.5));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
    }
}
