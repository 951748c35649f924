use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Row};

use crate::error::SqlMiddlewareDbError;
use crate::executor::WriteOutcome;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::{Params, build_result_set};

pub(crate) fn outcome(last_insert_id: Option<u64>, affected_rows: u64) -> WriteOutcome {
    WriteOutcome {
        last_insert_id: last_insert_id
            .and_then(|id| i64::try_from(id).ok())
            .unwrap_or(0),
        rows_affected: affected_rows,
    }
}

/// Execute an INSERT/UPDATE/DELETE and report the last insert id and rows affected.
///
/// # Errors
/// Returns `SqlMiddlewareDbError` if binding or execution fails.
pub async fn execute_write(
    conn: &mut Conn,
    query: &str,
    params: &[RowValues],
) -> Result<WriteOutcome, SqlMiddlewareDbError> {
    let params = Params::convert(params)?.into_driver();
    conn.exec_drop(query, params).await?;
    Ok(outcome(conn.last_insert_id(), conn.affected_rows()))
}

/// Execute a SELECT and materialize every row.
///
/// # Errors
/// Returns `SqlMiddlewareDbError` if binding or execution fails.
pub async fn execute_select<Q: Queryable>(
    conn: &mut Q,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlMiddlewareDbError> {
    let params = Params::convert(params)?.into_driver();
    let rows: Vec<Row> = conn.exec(query, params).await?;
    Ok(build_result_set(&rows))
}

/// Run raw SQL over the text protocol (no binds).
///
/// # Errors
/// Returns `SqlMiddlewareDbError` if any statement fails.
pub async fn execute_batch(conn: &mut Conn, query: &str) -> Result<(), SqlMiddlewareDbError> {
    conn.query_drop(query).await?;
    Ok(())
}
