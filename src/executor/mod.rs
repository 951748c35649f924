use async_trait::async_trait;

use crate::error::SqlMiddlewareDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

mod table;

pub use table::Table;

/// What a write reports back.
///
/// Both numbers are informational: a driver that cannot supply one yields 0
/// instead of failing the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Id generated by the last INSERT on the connection.
    pub last_insert_id: i64,
    pub rows_affected: u64,
}

/// Anything a built statement can run on: a pooled connection or an open transaction.
#[async_trait]
pub trait StatementExecutor: Send {
    /// Executes one INSERT/UPDATE/DELETE.
    async fn execute_write(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<WriteOutcome, SqlMiddlewareDbError>;

    /// Executes one SELECT and returns every row.
    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlMiddlewareDbError>;
}
