//! Convenient imports for typical `mapsql` usage.
//!
//! ```ignore
//! use mapsql::prelude::*;
//! ```

pub use crate::record;
pub use crate::{BuildError, BuildResult, FieldType, Mapping, Record, SqlMapper, Value};
pub use crate::{
    CountRequest, DeleteRequest, GetRequest, InsertRequest, QueryRequest, UpdateRequest,
};
pub use crate::{MysqlFormatter, SqlFormatter};
