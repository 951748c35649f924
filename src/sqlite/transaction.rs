use std::sync::Arc;

use bb8::{Pool, PooledConnection};

use crate::error::SqlMiddlewareDbError;
use crate::executor::WriteOutcome;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::config::SqliteManager;
use super::connection::run_blocking;
use super::executor;

/// Transaction handle that owns its pooled `SQLite` connection until completion.
///
/// Dropping an unfinished transaction rolls it back before the connection goes
/// back to the pool: on the current runtime when there is one, inline otherwise.
pub struct Tx {
    conn: Option<PooledConnection<'static, SqliteManager>>,
}

/// Check out a connection and `BEGIN IMMEDIATE` on it.
///
/// # Errors
/// Returns `SqlMiddlewareDbError` if no connection is available or BEGIN fails.
pub async fn begin_transaction(pool: &Pool<SqliteManager>) -> Result<Tx, SqlMiddlewareDbError> {
    let conn = pool.get_owned().await?;
    run_blocking(Arc::clone(&*conn), |guard| {
        guard.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    })
    .await?;
    Ok(Tx { conn: Some(conn) })
}

impl Tx {
    fn conn(&self) -> Result<&PooledConnection<'static, SqliteManager>, SqlMiddlewareDbError> {
        self.conn.as_ref().ok_or_else(|| {
            SqlMiddlewareDbError::ExecutionError("SQLite transaction already completed".into())
        })
    }

    /// Execute a write inside the open transaction.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError` if the transaction finished or execution fails.
    pub async fn execute_write(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<WriteOutcome, SqlMiddlewareDbError> {
        executor::execute_write(self.conn()?, query, params).await
    }

    /// Execute a read inside the open transaction.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError` if the transaction finished or execution fails.
    pub async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlMiddlewareDbError> {
        executor::execute_select(self.conn()?, query, params).await
    }

    /// Commit and return the connection to the pool.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError` if COMMIT fails; the connection is rolled back then.
    pub async fn commit(mut self) -> Result<(), SqlMiddlewareDbError> {
        self.finish("COMMIT").await
    }

    /// Roll back and return the connection to the pool.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError` if ROLLBACK fails.
    pub async fn rollback(mut self) -> Result<(), SqlMiddlewareDbError> {
        self.finish("ROLLBACK").await
    }

    async fn finish(&mut self, verb: &'static str) -> Result<(), SqlMiddlewareDbError> {
        let handle = Arc::clone(&**self.conn()?);
        run_blocking(handle, move |guard| {
            guard.execute_batch(verb)?;
            Ok(())
        })
        .await?;
        self.conn = None;
        Ok(())
    }
}

impl Drop for Tx {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        let shared = Arc::clone(&*conn);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = run_blocking(shared, rollback_if_open).await;
                drop(conn);
            });
        } else {
            // No runtime to hand off to; roll back here before the connection is released.
            let _ = rollback_if_open(&mut shared.blocking_lock());
            drop(conn);
        }
    }
}

fn rollback_if_open(conn: &mut rusqlite::Connection) -> Result<(), SqlMiddlewareDbError> {
    if !conn.is_autocommit() {
        conn.execute_batch("ROLLBACK")?;
    }
    Ok(())
}
