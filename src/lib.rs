//! Parameterized CRUD SQL built from condition and data maps, run over
//! pooled connections either one statement at a time or as an
//! all-or-nothing batch.
//!
//! ```rust,no_run
//! use sql_crud_middleware::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlMiddlewareDbError> {
//! let config = RegistryConfig::new()
//!     .with_handle("db", HandleConfig::sqlite("/tmp/shop.db").with_prefix("shop_"));
//! let registry = Registry::connect(&config).await?;
//!
//! let goods = registry.table("goods");
//! let id = goods.insert(&data_map! { "name" => "pen", "price" => 3_i64 }).await?;
//! goods
//!     .update(
//!         &Condition::new().filter("id = ?").bind(id),
//!         &data_map! { "price" => Expr::new("price * ?", vec![RowValues::Int(2)]) },
//!     )
//!     .await?;
//! let cheap: i64 = goods
//!     .count(Condition::new().filter("price < ?").bind(10_i64), None)
//!     .await?;
//! # let _ = cheap;
//! # Ok(()) }
//! ```
//!
//! Backends are selected with Cargo features: `sqlite` (default) and `mysql`.

pub mod condition;
pub mod config;
pub mod error;
pub mod executor;
pub mod expr;
pub mod logging;
pub mod pool;
pub mod prelude;
pub mod query_builder;
pub mod registry;
pub mod results;
pub mod transaction;
pub mod translation;
pub mod tx_outcome;
pub mod types;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::SqlMiddlewareDbError;

#[cfg(not(any(feature = "sqlite", feature = "mysql")))]
compile_error!("enable at least one backend feature: `sqlite` or `mysql`");
