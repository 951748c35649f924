use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bb8::{ManageConnection, Pool};
use tokio::sync::Mutex;

use crate::config::HandleConfig;
use crate::error::SqlMiddlewareDbError;

/// A rusqlite connection shared between the pool and blocking workers.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// bb8 manager for file-backed `SQLite` connections.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    pub(crate) path: String,
}

impl SqliteManager {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Build a pool sized from the handle's `max_open_conns`/`max_idle_conns`.
    ///
    /// `max_open_conns` caps the pool. `max_idle_conns` is the idle floor bb8
    /// keeps open (`min_idle`), clamped to the cap; those connections are
    /// opened while the pool is built and kept alive afterwards.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError` if the first connections cannot be opened.
    pub async fn build_pool(
        self,
        config: &HandleConfig,
    ) -> Result<Pool<SqliteManager>, SqlMiddlewareDbError> {
        let max_size = config.max_open_conns.max(1);
        Pool::builder()
            .max_size(max_size)
            .min_idle(Some(config.max_idle_conns.min(max_size)))
            .build(self)
            .await
            .map_err(|e| SqlMiddlewareDbError::ConnectionError(format!("sqlite pool error: {e}")))
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = rusqlite::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let path = self.path.clone();
        async move {
            let conn = rusqlite::Connection::open(&path)?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.query_row("PRAGMA journal_mode = WAL", [], |_row| Ok(()))?;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let conn = Arc::clone(conn);
        async move {
            let guard = conn.lock().await;
            guard.query_row("SELECT 1", [], |_row| Ok(()))
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}
