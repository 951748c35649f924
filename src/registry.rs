use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{DEFAULT_HANDLE, RegistryConfig};
use crate::error::SqlMiddlewareDbError;
use crate::executor::Table;
use crate::logging::log_failure;
use crate::pool::MiddlewarePool;

/// A configured handle: its pool and the prefix for its table names.
#[derive(Debug, Clone)]
pub struct HandleEntry {
    pub pool: MiddlewarePool,
    pub prefix: String,
}

/// Named pooled connections, built once at startup and read-only afterwards.
///
/// Cloning is cheap; every clone sees the same pools.
///
/// ```rust,no_run
/// use sql_crud_middleware::prelude::*;
///
/// # async fn demo() -> Result<(), SqlMiddlewareDbError> {
/// let config = RegistryConfig::from_path("db.toml")?;
/// let registry = Registry::connect(&config).await?;
/// let orders = registry.table("orders");
/// let open = orders.count(Condition::new().filter("status = ?").bind("open"), None).await?;
/// # let _ = open;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    handles: Arc<HashMap<String, HandleEntry>>,
}

impl Registry {
    /// Build a pool for every configured handle.
    ///
    /// # Errors
    /// Returns the first handle's configuration or connection error.
    pub async fn connect(config: &RegistryConfig) -> Result<Self, SqlMiddlewareDbError> {
        let mut handles = HashMap::new();
        for (name, handle) in config.handles() {
            let pool = MiddlewarePool::connect(handle).await.inspect_err(|e| {
                log_failure("Connect", format_args!("handle {name}: {e}"));
            })?;
            tracing::debug!(handle = name, driver = ?handle.driver, "connection pool ready");
            handles.insert(
                name.to_owned(),
                HandleEntry {
                    pool,
                    prefix: handle.prefix.clone(),
                },
            );
        }
        Ok(Self {
            handles: Arc::new(handles),
        })
    }

    /// Registry over pools built elsewhere.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, HandleEntry)>) -> Self {
        Self {
            handles: Arc::new(entries.into_iter().collect()),
        }
    }

    /// Look up a handle.
    ///
    /// # Panics
    /// An unknown handle means the process is misconfigured; this logs and panics.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &HandleEntry {
        match self.try_resolve(name) {
            Ok(entry) => entry,
            Err(err) => {
                log_failure("Resolve", &err);
                panic!("{err}");
            }
        }
    }

    /// Look up a handle without panicking.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if the handle is not registered.
    pub fn try_resolve(&self, name: &str) -> Result<&HandleEntry, SqlMiddlewareDbError> {
        self.handles.get(name).ok_or_else(|| {
            SqlMiddlewareDbError::ConfigError(format!("database {name} is not initialized"))
        })
    }

    /// Table prefix for a handle; empty when the handle sets none or is unknown.
    #[must_use]
    pub fn prefix(&self, name: &str) -> &str {
        self.handles
            .get(name)
            .map_or("", |entry| entry.prefix.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    /// `table` on the default `"db"` handle.
    #[must_use]
    pub fn table(&self, table: impl Into<String>) -> Table {
        self.table_on(DEFAULT_HANDLE, table)
    }

    /// `table` on a named handle. The handle is resolved when an operation runs.
    #[must_use]
    pub fn table_on(&self, handle: impl Into<String>, table: impl Into<String>) -> Table {
        Table::new(self.clone(), handle.into(), table.into())
    }
}
