use async_trait::async_trait;

#[cfg(feature = "sqlite")]
use bb8::PooledConnection;

#[cfg(feature = "sqlite")]
use crate::sqlite::{self, SqliteManager};
#[cfg(feature = "mysql")]
use crate::mysql;

use super::types::MiddlewarePool;
use crate::error::SqlMiddlewareDbError;
use crate::executor::{StatementExecutor, WriteOutcome};
use crate::results::ResultSet;
use crate::types::RowValues;

/// A connection checked out of a [`MiddlewarePool`] (auto-commit per statement).
pub enum MiddlewarePoolConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(PooledConnection<'static, SqliteManager>),
    #[cfg(feature = "mysql")]
    Mysql(mysql_async::Conn),
}

impl std::fmt::Debug for MiddlewarePoolConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").field(&"<Connection>").finish(),
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => f.debug_tuple("Mysql").field(&conn.id()).finish(),
            #[allow(unreachable_patterns)]
            _ => f.write_str("MiddlewarePoolConnection"),
        }
    }
}

/// An open transaction; the coordinator's only way to reach the database.
pub enum MiddlewareTx {
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::Tx),
    #[cfg(feature = "mysql")]
    Mysql(mysql::Tx),
}

impl MiddlewarePool {
    /// Get a connection from the pool
    ///
    /// # Errors
    /// Returns a pool or driver error if no connection can be handed out.
    pub async fn get_connection(&self) -> Result<MiddlewarePoolConnection, SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => {
                Ok(MiddlewarePoolConnection::Sqlite(pool.get_owned().await?))
            }
            #[cfg(feature = "mysql")]
            MiddlewarePool::Mysql(pool) => Ok(MiddlewarePoolConnection::Mysql(
                pool.get_conn().await?,
            )),
        }
    }

    /// Begin a transaction on a fresh connection.
    ///
    /// # Errors
    /// Returns a pool or driver error if no connection is available or BEGIN fails.
    pub async fn begin(&self) -> Result<MiddlewareTx, SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => {
                Ok(MiddlewareTx::Sqlite(sqlite::begin_transaction(pool).await?))
            }
            #[cfg(feature = "mysql")]
            MiddlewarePool::Mysql(pool) => {
                Ok(MiddlewareTx::Mysql(mysql::begin_transaction(pool).await?))
            }
        }
    }
}

impl MiddlewarePoolConnection {
    /// Run raw SQL with no binds, e.g. schema setup.
    ///
    /// # Errors
    /// Returns the driver error if any statement fails.
    pub async fn execute_batch(&mut self, query: &str) -> Result<(), SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => {
                sqlite::executor::execute_batch(conn, query).await
            }
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::Mysql(conn) => mysql::execute_batch(conn, query).await,
        }
    }
}

#[async_trait]
impl StatementExecutor for MiddlewarePoolConnection {
    async fn execute_write(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<WriteOutcome, SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => {
                sqlite::execute_write(conn, query, params).await
            }
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::Mysql(conn) => {
                mysql::execute_write(conn, query, params).await
            }
        }
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => {
                sqlite::execute_select(conn, query, params).await
            }
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::Mysql(conn) => {
                mysql::execute_select(conn, query, params).await
            }
        }
    }
}

impl MiddlewareTx {
    /// # Errors
    /// Returns the driver error if COMMIT fails.
    pub async fn commit(self) -> Result<(), SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewareTx::Sqlite(tx) => tx.commit().await,
            #[cfg(feature = "mysql")]
            MiddlewareTx::Mysql(tx) => tx.commit().await,
        }
    }

    /// # Errors
    /// Returns the driver error if ROLLBACK fails.
    pub async fn rollback(self) -> Result<(), SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewareTx::Sqlite(tx) => tx.rollback().await,
            #[cfg(feature = "mysql")]
            MiddlewareTx::Mysql(tx) => tx.rollback().await,
        }
    }
}

#[async_trait]
impl StatementExecutor for MiddlewareTx {
    async fn execute_write(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<WriteOutcome, SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewareTx::Sqlite(tx) => tx.execute_write(query, params).await,
            #[cfg(feature = "mysql")]
            MiddlewareTx::Mysql(tx) => tx.execute_write(query, params).await,
        }
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlMiddlewareDbError> {
        match self {
            #[cfg(feature = "sqlite")]
            MiddlewareTx::Sqlite(tx) => tx.execute_select(query, params).await,
            #[cfg(feature = "mysql")]
            MiddlewareTx::Mysql(tx) => tx.execute_select(query, params).await,
        }
    }
}
