use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::SqlMiddlewareDbError;

/// Handle used when a table binding does not name one.
pub const DEFAULT_HANDLE: &str = "db";

/// Backend a handle connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Mysql,
    Sqlite,
}

/// Connection settings for one named handle.
///
/// Every field has a default, so a handle section may be empty:
/// ```rust
/// use sql_crud_middleware::config::{Driver, RegistryConfig};
///
/// let cfg = RegistryConfig::from_toml_str(r#"
///     [db]
///     host = "10.0.0.5"
///     prefix = "shop_"
///
///     [report]
///     driver = "sqlite"
///     path = "/tmp/report.db"
/// "#)?;
/// let db = cfg.handle("db").unwrap();
/// assert_eq!(db.port, 3306);
/// assert_eq!(db.prefix, "shop_");
/// assert_eq!(cfg.handle("report").unwrap().driver, Driver::Sqlite);
/// # Ok::<(), sql_crud_middleware::SqlMiddlewareDbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    pub driver: Driver,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    pub collation: String,
    /// Prepended to every table name generated for this handle.
    pub prefix: String,
    /// Upper bound on pooled connections.
    #[serde(alias = "maxOpenConns")]
    pub max_open_conns: u32,
    /// Idle connections the pool keeps open, opened eagerly. A floor, not a cap.
    #[serde(alias = "maxIdleConns")]
    pub max_idle_conns: u32,
    /// `SQLite` database file; falls back to `database`.
    pub path: Option<String>,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            host: "localhost".into(),
            port: 3306,
            username: "root".into(),
            password: String::new(),
            database: "test".into(),
            charset: "utf8mb4".into(),
            collation: "utf8_general_ci".into(),
            prefix: String::new(),
            max_open_conns: 20,
            max_idle_conns: 10,
            path: None,
        }
    }
}

impl HandleConfig {
    /// `SQLite` handle backed by the file at `path`.
    #[must_use]
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            driver: Driver::Sqlite,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_pool_size(mut self, max_open_conns: u32, max_idle_conns: u32) -> Self {
        self.max_open_conns = max_open_conns;
        self.max_idle_conns = max_idle_conns;
        self
    }

    #[must_use]
    pub fn sqlite_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.database)
    }

    /// Session setup run on every new `MySQL` connection.
    #[must_use]
    pub fn mysql_init_statement(&self) -> String {
        let collation = if self.collation.starts_with(&self.charset) {
            self.collation.clone()
        } else {
            format!("{}_general_ci", self.charset)
        };
        format!("SET NAMES {} COLLATE {collation}", self.charset)
    }
}

/// Handle name → settings, the input for
/// [`Registry::connect`](crate::registry::Registry::connect).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RegistryConfig {
    handles: BTreeMap<String, HandleConfig>,
}

impl RegistryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_handle(mut self, name: impl Into<String>, config: HandleConfig) -> Self {
        self.handles.insert(name.into(), config);
        self
    }

    /// Parse a TOML document with one table per handle.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if the document is not valid TOML
    /// or a field has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self, SqlMiddlewareDbError> {
        toml::from_str(source)
            .map_err(|e| SqlMiddlewareDbError::ConfigError(format!("invalid handle config: {e}")))
    }

    /// Read and parse a TOML config file.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::ConfigError` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SqlMiddlewareDbError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            SqlMiddlewareDbError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    #[must_use]
    pub fn handle(&self, name: &str) -> Option<&HandleConfig> {
        self.handles.get(name)
    }

    pub fn handles(&self) -> impl Iterator<Item = (&str, &HandleConfig)> {
        self.handles.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
