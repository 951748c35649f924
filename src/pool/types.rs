#[cfg(feature = "sqlite")]
use bb8::Pool as Bb8Pool;

#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteManager;

use crate::config::{Driver, HandleConfig};
use crate::error::SqlMiddlewareDbError;
use crate::types::DatabaseType;

/// Connection pool for one handle
///
/// This enum wraps the pool type of each supported backend.
#[derive(Clone)]
pub enum MiddlewarePool {
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(Bb8Pool<SqliteManager>),
    /// `MySQL` connection pool
    #[cfg(feature = "mysql")]
    Mysql(mysql_async::Pool),
}

impl std::fmt::Debug for MiddlewarePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => f.debug_tuple("Sqlite").field(&pool.state()).finish(),
            #[cfg(feature = "mysql")]
            Self::Mysql(_) => f.debug_tuple("Mysql").field(&"<Pool>").finish(),
            #[allow(unreachable_patterns)]
            _ => f.write_str("MiddlewarePool"),
        }
    }
}

impl MiddlewarePool {
    /// Build the pool a handle's configuration asks for.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if the driver is not compiled in,
    /// or a connection error if the backend cannot be reached.
    pub async fn connect(config: &HandleConfig) -> Result<Self, SqlMiddlewareDbError> {
        match config.driver {
            #[cfg(feature = "sqlite")]
            Driver::Sqlite => {
                let pool = SqliteManager::new(config.sqlite_path())
                    .build_pool(config)
                    .await?;
                Ok(MiddlewarePool::Sqlite(pool))
            }
            #[cfg(feature = "mysql")]
            Driver::Mysql => Ok(MiddlewarePool::Mysql(crate::mysql::build_pool(config))),
            #[allow(unreachable_patterns)]
            other => Err(SqlMiddlewareDbError::ConfigError(format!(
                "driver {other:?} is not enabled in this build"
            ))),
        }
    }

    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => DatabaseType::Sqlite,
            #[cfg(feature = "mysql")]
            Self::Mysql(_) => DatabaseType::Mysql,
        }
    }
}
