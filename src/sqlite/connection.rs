use crate::error::SqlMiddlewareDbError;

use super::config::SharedSqliteConnection;

/// Run `func` against the connection on the blocking thread pool.
///
/// # Errors
/// Returns whatever `func` returns, or `ExecutionError` if the blocking task panicked.
pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlMiddlewareDbError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlMiddlewareDbError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| {
        SqlMiddlewareDbError::ExecutionError(format!("sqlite spawn_blocking join error: {e}"))
    })?
}
