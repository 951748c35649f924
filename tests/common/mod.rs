#![allow(dead_code)]

use sql_crud_middleware::prelude::*;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub const SCHEMA: &str = "
    CREATE TABLE shop_goods (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price INTEGER NOT NULL,
        note TEXT
    );
    CREATE TABLE shop_stock (
        sku TEXT PRIMARY KEY,
        qty INTEGER NOT NULL
    );
";

/// A registry with one `SQLite` handle named `db` (prefix `shop_`) in a
/// throwaway directory. Keep the `TempDir` alive for the duration of the test.
pub async fn shop() -> Result<(TempDir, Registry), Box<dyn std::error::Error>> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("shop.db");
    let config = RegistryConfig::new().with_handle(
        "db",
        HandleConfig::sqlite(path.to_string_lossy())
            .with_prefix("shop_")
            .with_pool_size(4, 1),
    );
    let registry = Registry::connect(&config).await?;
    registry
        .resolve("db")
        .pool
        .get_connection()
        .await?
        .execute_batch(SCHEMA)
        .await?;
    Ok((dir, registry))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
