use thiserror::Error;

/// Every failure the crate reports. Driver errors pass through unchanged.
#[derive(Debug, Error)]
pub enum SqlMiddlewareDbError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    PoolErrorSqlite(#[from] bb8::RunError<rusqlite::Error>),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MysqlError(#[from] mysql_async::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error(transparent)]
    DecodeError(#[from] serde_json::Error),

    /// A single-row read matched nothing. Expected outcome; never logged.
    #[error("no rows in result set")]
    NoRows,
}

impl SqlMiddlewareDbError {
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }
}
