use mysql_async::prelude::Queryable;
use mysql_async::{Pool, Transaction, TxOpts};

use crate::error::SqlMiddlewareDbError;
use crate::executor::WriteOutcome;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::executor::{self, outcome};
use super::params::Params;

/// Transaction handle that owns its pooled `MySQL` connection until completion.
///
/// `mysql_async` rolls an unfinished transaction back when it is dropped.
pub struct Tx {
    inner: Transaction<'static>,
}

/// Check out a connection and start a transaction on it.
///
/// # Errors
/// Returns `SqlMiddlewareDbError` if no connection is available or START TRANSACTION fails.
pub async fn begin_transaction(pool: &Pool) -> Result<Tx, SqlMiddlewareDbError> {
    let inner = pool.start_transaction(TxOpts::default()).await?;
    Ok(Tx { inner })
}

impl Tx {
    /// Execute a write inside the open transaction.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError` if binding or execution fails.
    pub async fn execute_write(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<WriteOutcome, SqlMiddlewareDbError> {
        let params = Params::convert(params)?.into_driver();
        self.inner.exec_drop(query, params).await?;
        Ok(outcome(self.inner.last_insert_id(), self.inner.affected_rows()))
    }

    /// Execute a read inside the open transaction.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError` if binding or execution fails.
    pub async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlMiddlewareDbError> {
        executor::execute_select(&mut self.inner, query, params).await
    }

    /// # Errors
    /// Returns `SqlMiddlewareDbError` if COMMIT fails.
    pub async fn commit(self) -> Result<(), SqlMiddlewareDbError> {
        self.inner.commit().await?;
        Ok(())
    }

    /// # Errors
    /// Returns `SqlMiddlewareDbError` if ROLLBACK fails.
    pub async fn rollback(self) -> Result<(), SqlMiddlewareDbError> {
        self.inner.rollback().await?;
        Ok(())
    }
}
