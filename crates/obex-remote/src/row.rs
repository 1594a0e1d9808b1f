//! Typed accessors over loosely-typed remote result rows
//!
//! Remote catalogs hand back untyped column/value maps. [`Row`] is the
//! validated boundary: handlers pull columns out with typed accessors and
//! convert the result into their own state structs, so shape mismatches fail
//! loudly at fetch time instead of leaking dynamic values into the engine.

use crate::error::RemoteError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row from a remote query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Empty row
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add a column value, builder style
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Required string column
    ///
    /// # Errors
    /// Returns [`RemoteError::Shape`] when the column is absent or not a
    /// string.
    pub fn string(&self, column: &str) -> Result<&str, RemoteError> {
        self.0
            .get(column)
            .and_then(Value::as_str)
            .ok_or_else(|| RemoteError::Shape(format!("missing string column {column}")))
    }

    /// Required integer column
    ///
    /// # Errors
    /// Returns [`RemoteError::Shape`] when the column is absent or not an
    /// integer.
    pub fn integer(&self, column: &str) -> Result<i64, RemoteError> {
        self.0
            .get(column)
            .and_then(Value::as_i64)
            .ok_or_else(|| RemoteError::Shape(format!("missing integer column {column}")))
    }

    /// Optional string column; absent and null both read as `None`
    #[must_use]
    pub fn opt_string(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(Value::as_str)
    }

    /// Number of columns in the row
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the row has no columns
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(columns: Map<String, Value>) -> Self {
        Self(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_string_access() {
        let row = Row::new().with("NAME", "QUEUE1");
        assert_eq!(row.string("NAME").unwrap(), "QUEUE1");
    }

    #[test]
    fn row_missing_string_is_shape_error() {
        let row = Row::new();
        let result = row.string("NAME");
        assert!(matches!(result, Err(RemoteError::Shape(_))));
    }

    #[test]
    fn row_integer_access() {
        let row = Row::new().with("LENGTH", 2000);
        assert_eq!(row.integer("LENGTH").unwrap(), 2000);
    }

    #[test]
    fn row_wrong_type_is_shape_error() {
        let row = Row::new().with("LENGTH", "not a number");
        assert!(matches!(row.integer("LENGTH"), Err(RemoteError::Shape(_))));
    }

    #[test]
    fn row_opt_string_handles_null() {
        let row = Row::new().with("WRITER", Value::Null);
        assert_eq!(row.opt_string("WRITER"), None);
        assert_eq!(row.opt_string("ABSENT"), None);
    }
}
