//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::condition::{Condition, DataMap};
pub use crate::config::{DEFAULT_HANDLE, Driver, HandleConfig, RegistryConfig};
pub use crate::data_map;
pub use crate::error::SqlMiddlewareDbError;
pub use crate::executor::{StatementExecutor, Table, WriteOutcome};
pub use crate::expr::{Expr, FieldValue};
pub use crate::logging::log_failure;
pub use crate::pool::{MiddlewarePool, MiddlewarePoolConnection, MiddlewareTx};
pub use crate::query_builder::{Statement, TableBinding};
pub use crate::registry::{HandleEntry, Registry};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::transaction::BatchOperation;
pub use crate::translation::{EscapeMode, expand_placeholders, expand_placeholders_with};
pub use crate::tx_outcome::TxOutcome;
pub use crate::types::{DatabaseType, RowValues};
