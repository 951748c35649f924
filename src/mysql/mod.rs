// MySQL backend
//
// - config: pool options built from a handle's settings
// - params: conversion between `RowValues` and mysql_async values
// - executor: statement execution on a pooled connection
// - transaction: explicit transaction handle

pub mod config;
pub mod executor;
pub mod params;
pub mod transaction;

pub use config::build_pool;
pub use executor::{execute_batch, execute_select, execute_write};
pub use params::Params;
pub use transaction::{Tx, begin_transaction};
