use std::borrow::Cow;

use serde::de::DeserializeOwned;

use super::{StatementExecutor, WriteOutcome};
use crate::condition::{Condition, DataMap};
use crate::error::SqlMiddlewareDbError;
use crate::logging::{log_failure, log_statement};
use crate::query_builder::{Statement, TableBinding};
use crate::registry::{HandleEntry, Registry};
use crate::results::ResultSet;
use crate::transaction::{BatchOperation, run_batch};
use crate::translation::expand_placeholders_with;
use crate::tx_outcome::TxOutcome;
use crate::types::RowValues;

/// CRUD operations for one table on one handle.
///
/// Every operation resolves the handle first (panicking if it was never
/// registered), builds its statement, and runs it on a connection from the
/// handle's pool. Failures are logged with the operation name and returned as-is.
#[derive(Debug, Clone)]
pub struct Table {
    registry: Registry,
    handle: String,
    table: String,
}

impl Table {
    pub(crate) fn new(registry: Registry, handle: String, table: String) -> Self {
        Self {
            registry,
            handle,
            table,
        }
    }

    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.table
    }

    /// Builder scope for this table: handle, table and the handle's prefix.
    ///
    /// # Panics
    /// If the handle is not registered.
    #[must_use]
    pub fn binding(&self) -> TableBinding {
        self.bind_entry(self.entry())
    }

    fn entry(&self) -> &HandleEntry {
        self.registry.resolve(&self.handle)
    }

    fn bind_entry(&self, entry: &HandleEntry) -> TableBinding {
        TableBinding::new(self.handle.as_str(), self.table.as_str(), entry.prefix.as_str())
    }

    /// Insert one row and return the generated id (0 when the driver has none).
    ///
    /// # Errors
    /// Returns the pool or driver error; it is logged under `Insert`.
    pub async fn insert(&self, data: &DataMap) -> Result<i64, SqlMiddlewareDbError> {
        let entry = self.entry();
        let stmt = self.bind_entry(entry).build_insert(data, None);
        let outcome = self.write("Insert", entry, &stmt, false).await?;
        Ok(outcome.last_insert_id)
    }

    /// Insert many rows in one statement, projected onto `columns`.
    ///
    /// # Errors
    /// An empty `rows` is rejected by the driver; that error, like any other,
    /// is logged under `BatchInsert`.
    pub async fn batch_insert<C: AsRef<str>>(
        &self,
        columns: &[C],
        rows: &[DataMap],
    ) -> Result<u64, SqlMiddlewareDbError> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_owned()).collect();
        let entry = self.entry();
        let stmt = self.bind_entry(entry).build_batch_insert(&columns, rows, None);
        let outcome = self.write("BatchInsert", entry, &stmt, false).await?;
        Ok(outcome.rows_affected)
    }

    /// Update the rows matching `condition`; returns rows affected.
    ///
    /// # Errors
    /// Returns expansion, pool or driver errors, logged under `Update`.
    pub async fn update(
        &self,
        condition: &Condition,
        data: &DataMap,
    ) -> Result<u64, SqlMiddlewareDbError> {
        let entry = self.entry();
        let stmt = self.bind_entry(entry).build_update(condition, data);
        let outcome = self.write("Update", entry, &stmt, true).await?;
        Ok(outcome.rows_affected)
    }

    /// Delete the rows matching `condition`; returns rows affected.
    ///
    /// # Errors
    /// Returns expansion, pool or driver errors, logged under `Delete`.
    pub async fn delete(&self, condition: &Condition) -> Result<u64, SqlMiddlewareDbError> {
        let entry = self.entry();
        let stmt = self.bind_entry(entry).build_delete(condition);
        let outcome = self.write("Delete", entry, &stmt, true).await?;
        Ok(outcome.rows_affected)
    }

    /// `COUNT(*)`, or `COUNT(column)`, over the rows matching `condition`.
    ///
    /// Any `select` on the condition is replaced.
    ///
    /// # Errors
    /// Returns expansion, pool or driver errors, logged under `Count`.
    pub async fn count(
        &self,
        condition: Condition,
        column: Option<&str>,
    ) -> Result<i64, SqlMiddlewareDbError> {
        let rows = self.read("Count", &condition.for_count(column)).await?;
        match rows.scalar() {
            Some(RowValues::Int(n)) => Ok(*n),
            None | Some(RowValues::Null) => Ok(0),
            Some(other) => {
                let err = SqlMiddlewareDbError::ExecutionError(format!(
                    "COUNT returned a non-integer value: {other:?}"
                ));
                log_failure("Count", &err);
                Err(err)
            }
        }
    }

    /// First row matching `condition`, scanned into `T`. The limit is forced to 1.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::NoRows` (not logged) when nothing
    /// matches; any other error is logged under `FindOne`.
    pub async fn find_one<T: DeserializeOwned>(
        &self,
        condition: Condition,
    ) -> Result<T, SqlMiddlewareDbError> {
        let rows = self.read("FindOne", &condition.for_find_one()).await?;
        let row = rows.results.first().ok_or(SqlMiddlewareDbError::NoRows)?;
        row.deserialize()
            .inspect_err(|e| log_failure("FindOne", e))
    }

    /// Every row matching `condition`, scanned into `T`. No match is an empty `Vec`.
    ///
    /// # Errors
    /// Returns expansion, pool, driver or decode errors, logged under `Find`.
    pub async fn find<T: DeserializeOwned>(
        &self,
        condition: &Condition,
    ) -> Result<Vec<T>, SqlMiddlewareDbError> {
        let rows = self.read("Find", condition).await?;
        rows.deserialize_rows()
            .inspect_err(|e| log_failure("Find", e))
    }

    /// Every row of the table; `columns` narrows the projection when not empty.
    ///
    /// # Errors
    /// Returns pool, driver or decode errors, logged under `FindAll`.
    pub async fn find_all<T: DeserializeOwned>(
        &self,
        columns: &[&str],
    ) -> Result<Vec<T>, SqlMiddlewareDbError> {
        let mut condition = Condition::new();
        if !columns.is_empty() {
            condition = condition.select(columns.join(","));
        }
        let rows = self.read("FindAll", &condition).await?;
        rows.deserialize_rows()
            .inspect_err(|e| log_failure("FindAll", e))
    }

    /// Like [`find`](Self::find) but returns the raw result set.
    ///
    /// # Errors
    /// Returns expansion, pool or driver errors, logged under `Find`.
    pub async fn find_rows(
        &self,
        condition: &Condition,
    ) -> Result<ResultSet, SqlMiddlewareDbError> {
        self.read("Find", condition).await
    }

    /// Run `operations` in order inside one transaction.
    ///
    /// Commits only if every operation succeeds; the first failure rolls the
    /// whole batch back and is returned.
    ///
    /// # Errors
    /// Returns the begin, operation or commit error, logged under `DoTransactions`.
    pub async fn do_transactions(
        &self,
        operations: Vec<BatchOperation>,
    ) -> Result<TxOutcome, SqlMiddlewareDbError> {
        let entry = self.entry();
        let binding = self.bind_entry(entry);
        run_batch(&entry.pool, &binding, &operations)
            .await
            .inspect_err(|e| log_failure("DoTransactions", e))
    }

    async fn write(
        &self,
        operation: &str,
        entry: &HandleEntry,
        stmt: &Statement,
        expand: bool,
    ) -> Result<WriteOutcome, SqlMiddlewareDbError> {
        log_statement(operation, &self.handle, stmt);
        let result = async {
            let (sql, params) = if expand {
                let escapes = entry.pool.db_type().into();
                expand_placeholders_with(&stmt.sql, &stmt.params, escapes)?
            } else {
                (
                    Cow::Borrowed(stmt.sql.as_str()),
                    Cow::Borrowed(stmt.params.as_slice()),
                )
            };
            let mut conn = entry.pool.get_connection().await?;
            conn.execute_write(&sql, &params).await
        }
        .await;
        result.inspect_err(|e| log_failure(operation, e))
    }

    async fn read(
        &self,
        operation: &str,
        condition: &Condition,
    ) -> Result<ResultSet, SqlMiddlewareDbError> {
        let entry = self.entry();
        let stmt = self.bind_entry(entry).build_query(condition);
        log_statement(operation, &self.handle, &stmt);
        let result = async {
            let escapes = entry.pool.db_type().into();
            let (sql, params) = expand_placeholders_with(&stmt.sql, &stmt.params, escapes)?;
            let mut conn = entry.pool.get_connection().await?;
            conn.execute_select(&sql, &params).await
        }
        .await;
        result.inspect_err(|e| log_failure(operation, e))
    }
}
