// SQLite backend
//
// - config: bb8 connection manager and pool setup
// - connection: blocking execution on a pooled connection
// - params: conversion from `RowValues` to rusqlite values
// - query: result set extraction
// - executor: statement execution
// - transaction: explicit transaction handle

pub mod config;
pub mod connection;
pub mod executor;
pub mod params;
pub mod query;
pub mod transaction;

pub use config::{SharedSqliteConnection, SqliteManager};
pub use executor::{execute_select, execute_write};
pub use params::Params;
pub use query::build_result_set;
pub use transaction::{Tx, begin_transaction};
