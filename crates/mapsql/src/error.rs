//! Error types for mapsql

use std::fmt;
use thiserror::Error;

/// Result type alias for statement building
pub type BuildResult<T> = Result<T, BuildError>;

/// Request argument that must be present before anything is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    Data,
    Mapping,
    Table,
    Where,
    Count,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Argument::Data => "data",
            Argument::Mapping => "mapping",
            Argument::Table => "tableName",
            Argument::Where => "where",
            Argument::Count => "count",
        };
        f.write_str(name)
    }
}

/// Coordinate axis of a point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("X"),
            Axis::Y => f.write_str("Y"),
        }
    }
}

/// Error types for statement building.
///
/// Every variant is a caller fault; nothing is retryable and no partial
/// statement is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// A required request argument is null or absent
    #[error("Unexpected {0} value null or undefined")]
    MissingArgument(Argument),

    /// A where value is unmapped, null, or does not match its declared type
    #[error("Invalid value {field} : {value} in where object")]
    InvalidWhereValue { field: String, value: String },

    /// A polygon value is not a sequence of points
    #[error("Invalid Polygon value of {field}")]
    InvalidPolygon { field: String },

    /// A point coordinate cannot be parsed as a finite number
    #[error("Invalid {axis} value of {field}: {value}")]
    InvalidCoordinate {
        field: String,
        axis: Axis,
        value: String,
    },

    /// Advanced where object without a non-empty `and` or `or` group
    #[error("'and' value or 'or' value required")]
    MissingFilterGroup,

    /// Malformed order / offset / count argument
    #[error("{0}")]
    InvalidShape(String),

    /// Table identifier that cannot be embedded safely
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl BuildError {
    /// Create an invalid where value error
    pub fn invalid_where(field: impl Into<String>, value: impl fmt::Display) -> Self {
        Self::InvalidWhereValue {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Create an invalid coordinate error
    pub fn invalid_coordinate(field: impl Into<String>, axis: Axis, value: impl fmt::Display) -> Self {
        Self::InvalidCoordinate {
            field: field.into(),
            axis,
            value: value.to_string(),
        }
    }

    /// Create an invalid shape error
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidShape(message.into())
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Check if this is a missing argument error
    pub fn is_missing_argument(&self) -> bool {
        matches!(self, Self::MissingArgument(_))
    }

    /// Check if this is an invalid where value error
    pub fn is_invalid_where(&self) -> bool {
        matches!(self, Self::InvalidWhereValue { .. })
    }

    /// Check if this error comes from geometry compilation
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            Self::InvalidPolygon { .. } | Self::InvalidCoordinate { .. }
        )
    }
}
