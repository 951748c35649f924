use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use mysql_async::{Row, Value};

use crate::error::SqlMiddlewareDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

const BINARY_CHARSET: u16 = 63;

/// Convert a single `RowValues` to a `mysql_async` `Value`.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::ParameterError` for a list that was never expanded.
pub fn row_value_to_mysql_value(value: &RowValues) -> Result<Value, SqlMiddlewareDbError> {
    Ok(match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        RowValues::Timestamp(dt) => timestamp_value(dt),
        RowValues::Null => Value::NULL,
        RowValues::JSON(jval) => Value::Bytes(jval.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
        RowValues::List(_) => {
            return Err(SqlMiddlewareDbError::ParameterError(
                "list bind reached mysql without placeholder expansion".into(),
            ));
        }
    })
}

#[allow(clippy::cast_possible_truncation)]
fn timestamp_value(dt: &NaiveDateTime) -> Value {
    Value::Date(
        u16::try_from(dt.year()).unwrap_or(0),
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
        dt.nanosecond() / 1_000,
    )
}

/// `MySQL` parameter container.
#[derive(Debug, Clone, Default)]
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert middleware row values into `MySQL` values.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ParameterError` if any value cannot be bound.
    pub fn convert(params: &[RowValues]) -> Result<Self, SqlMiddlewareDbError> {
        params
            .iter()
            .map(row_value_to_mysql_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Params)
    }

    pub(crate) fn into_driver(self) -> mysql_async::Params {
        if self.0.is_empty() {
            mysql_async::Params::Empty
        } else {
            mysql_async::Params::Positional(self.0)
        }
    }
}

/// Convert one column value read back from the server.
///
/// Byte strings become `Text` unless the column is binary or not UTF-8.
#[must_use]
pub fn mysql_value_to_row_value(value: &Value, binary: bool) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        Value::Int(i) => RowValues::Int(*i),
        Value::UInt(u) => {
            i64::try_from(*u).map_or_else(|_| RowValues::Text(u.to_string()), RowValues::Int)
        }
        Value::Float(f) => RowValues::Float(f64::from(*f)),
        Value::Double(f) => RowValues::Float(*f),
        Value::Bytes(bytes) if binary => RowValues::Blob(bytes.clone()),
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text.to_owned()),
            Err(_) => RowValues::Blob(bytes.clone()),
        },
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                })
                .map_or(RowValues::Null, RowValues::Timestamp)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u64::from(*days) * 24 + u64::from(*hours);
            RowValues::Text(format!(
                "{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
            ))
        }
    }
}

/// Collect fetched rows into a `ResultSet`.
#[must_use]
pub fn build_result_set(rows: &[Row]) -> ResultSet {
    let mut result_set = ResultSet::with_capacity(rows.len());
    let Some(first) = rows.first() else {
        return result_set;
    };

    let columns = first.columns_ref();
    let column_names: Vec<String> = columns.iter().map(|c| c.name_str().into_owned()).collect();
    let binary: Vec<bool> = columns
        .iter()
        .map(|c| c.character_set() == BINARY_CHARSET)
        .collect();
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let values = (0..binary.len())
            .map(|i| {
                row.as_ref(i)
                    .map_or(RowValues::Null, |v| mysql_value_to_row_value(v, binary[i]))
            })
            .collect();
        result_set.add_row_values(values);
    }
    result_set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_bool_and_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(8, 7, 6, 5)
            .unwrap();
        let params = Params::convert(&[RowValues::Bool(true), RowValues::Timestamp(ts)]).unwrap();
        assert_eq!(
            params.0,
            vec![Value::Int(1), Value::Date(2024, 3, 9, 8, 7, 6, 5)]
        );
    }

    #[test]
    fn reads_values_back() {
        assert_eq!(
            mysql_value_to_row_value(&Value::Bytes(b"pen".to_vec()), false),
            RowValues::Text("pen".into())
        );
        assert_eq!(
            mysql_value_to_row_value(&Value::Bytes(b"pen".to_vec()), true),
            RowValues::Blob(b"pen".to_vec())
        );
        assert_eq!(
            mysql_value_to_row_value(&Value::Date(0, 0, 0, 0, 0, 0, 0), false),
            RowValues::Null
        );
        assert_eq!(
            mysql_value_to_row_value(&Value::UInt(7), false),
            RowValues::Int(7)
        );
    }

    #[test]
    fn rejects_unexpanded_list() {
        let err = Params::convert(&[RowValues::List(vec![])]).unwrap_err();
        assert!(matches!(err, SqlMiddlewareDbError::ParameterError(_)));
    }

    #[test]
    fn empty_binds_use_empty_params() {
        assert_eq!(Params::default().into_driver(), mysql_async::Params::Empty);
    }
}
