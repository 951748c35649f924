use std::fmt::Display;

use crate::query_builder::Statement;

/// Record a failed operation. Fire-and-forget.
///
/// `operation` is the public operation name (`Insert`, `FindOne`,
/// `DoTransactions`, ...).
pub fn log_failure(operation: &str, message: impl Display) {
    tracing::error!(operation, error = %message, "{operation} Error");
}

pub(crate) fn log_statement(operation: &str, handle: &str, statement: &Statement) {
    tracing::debug!(
        operation,
        handle,
        sql = %statement.sql,
        binds = statement.params.len(),
        "executing statement"
    );
}
