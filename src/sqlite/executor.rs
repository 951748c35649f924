use std::sync::Arc;

use crate::error::SqlMiddlewareDbError;
use crate::executor::WriteOutcome;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::config::SharedSqliteConnection;
use super::connection::run_blocking;
use super::params::Params;
use super::query::build_result_set;

/// Execute an INSERT/UPDATE/DELETE and report the last rowid and rows affected.
///
/// # Errors
/// Returns `SqlMiddlewareDbError` if binding, preparing or executing fails.
pub async fn execute_write(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<WriteOutcome, SqlMiddlewareDbError> {
    let values = Params::convert(params)?.0;
    let sql_owned = query.to_owned();
    run_blocking(Arc::clone(conn), move |guard| {
        let mut stmt = guard.prepare_cached(&sql_owned)?;
        let affected = stmt.execute(rusqlite::params_from_iter(values.iter()))?;
        drop(stmt);
        Ok(WriteOutcome {
            last_insert_id: guard.last_insert_rowid(),
            rows_affected: u64::try_from(affected).unwrap_or(0),
        })
    })
    .await
}

/// Execute a SELECT and materialize every row.
///
/// # Errors
/// Returns `SqlMiddlewareDbError` if binding, preparing or executing fails.
pub async fn execute_select(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlMiddlewareDbError> {
    let values = Params::convert(params)?.0;
    let sql_owned = query.to_owned();
    run_blocking(Arc::clone(conn), move |guard| {
        let mut stmt = guard.prepare(&sql_owned)?;
        build_result_set(&mut stmt, &values)
    })
    .await
}

/// Run raw SQL (one or more statements, no binds).
///
/// # Errors
/// Returns `SqlMiddlewareDbError` if any statement fails.
pub async fn execute_batch(
    conn: &SharedSqliteConnection,
    query: &str,
) -> Result<(), SqlMiddlewareDbError> {
    let sql_owned = query.to_owned();
    run_blocking(Arc::clone(conn), move |guard| {
        guard.execute_batch(&sql_owned)?;
        Ok(())
    })
    .await
}
