use rusqlite::types::Value;

use crate::error::SqlMiddlewareDbError;
use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::ParameterError` for a list that was never expanded.
pub fn row_value_to_sqlite_value(value: &RowValues) -> Result<Value, SqlMiddlewareDbError> {
    Ok(match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
        RowValues::List(_) => {
            return Err(SqlMiddlewareDbError::ParameterError(
                "list bind reached sqlite without placeholder expansion".into(),
            ));
        }
    })
}

/// `SQLite` parameter container.
#[derive(Debug, Clone, Default)]
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert middleware row values into `SQLite` values.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ParameterError` if any value cannot be bound.
    pub fn convert(params: &[RowValues]) -> Result<Self, SqlMiddlewareDbError> {
        params
            .iter()
            .map(row_value_to_sqlite_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Params)
    }

    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }
}
