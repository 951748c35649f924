use std::borrow::Cow;

use crate::condition::{Condition, DataMap};
use crate::error::SqlMiddlewareDbError;
use crate::executor::{StatementExecutor, WriteOutcome};
use crate::pool::MiddlewarePool;
use crate::query_builder::{Statement, TableBinding};
use crate::translation::{EscapeMode, expand_placeholders_with};
use crate::tx_outcome::TxOutcome;

/// One write inside an all-or-nothing batch.
///
/// A batch is an ordered `Vec<BatchOperation>`; operations run in that order
/// and the same kind may appear any number of times.
///
/// ```rust
/// use sql_crud_middleware::prelude::*;
///
/// let ops = vec![
///     BatchOperation::insert(data_map! { "name" => "pen" }),
///     BatchOperation::update(
///         Condition::new().table("stock").filter("sku = ?").bind("pen"),
///         data_map! { "qty" => Expr::raw("qty - 1") },
///     ),
///     BatchOperation::delete(Condition::new().filter("id IN (?)").bind(vec![4_i64, 5])),
/// ];
/// assert_eq!(ops.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOperation {
    Insert {
        table: Option<String>,
        data: DataMap,
    },
    BatchInsert {
        table: Option<String>,
        columns: Vec<String>,
        rows: Vec<DataMap>,
    },
    Update {
        condition: Condition,
        data: DataMap,
    },
    Delete {
        condition: Condition,
    },
}

impl BatchOperation {
    #[must_use]
    pub fn insert(data: DataMap) -> Self {
        Self::Insert { table: None, data }
    }

    #[must_use]
    pub fn batch_insert<C: Into<String>>(
        columns: impl IntoIterator<Item = C>,
        rows: Vec<DataMap>,
    ) -> Self {
        Self::BatchInsert {
            table: None,
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    #[must_use]
    pub fn update(condition: Condition, data: DataMap) -> Self {
        Self::Update { condition, data }
    }

    #[must_use]
    pub fn delete(condition: Condition) -> Self {
        Self::Delete { condition }
    }

    /// Target another table (still prefixed) instead of the batch's bound table.
    #[must_use]
    pub fn with_table(self, name: impl Into<String>) -> Self {
        let name = name.into();
        match self {
            Self::Insert { data, .. } => Self::Insert {
                table: Some(name),
                data,
            },
            Self::BatchInsert { columns, rows, .. } => Self::BatchInsert {
                table: Some(name),
                columns,
                rows,
            },
            Self::Update { condition, data } => Self::Update {
                condition: condition.table(name),
                data,
            },
            Self::Delete { condition } => Self::Delete {
                condition: condition.table(name),
            },
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::BatchInsert { .. } => "batchInsert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// The statement this operation runs, before list expansion.
    #[must_use]
    pub fn statement(&self, binding: &TableBinding) -> Statement {
        match self {
            Self::Insert { table, data } => binding.build_insert(data, table.as_deref()),
            Self::BatchInsert {
                table,
                columns,
                rows,
            } => binding.build_batch_insert(columns, rows, table.as_deref()),
            Self::Update { condition, data } => binding.build_update(condition, data),
            Self::Delete { condition } => binding.build_delete(condition),
        }
    }

    /// Inserts never carry list binds; updates and deletes may.
    fn expands_lists(&self) -> bool {
        matches!(self, Self::Update { .. } | Self::Delete { .. })
    }
}

/// Run `operations` in one transaction on `pool`.
///
/// Stops at the first failure, rolls back and returns that failure. The
/// caller logs it.
pub(crate) async fn run_batch(
    pool: &MiddlewarePool,
    binding: &TableBinding,
    operations: &[BatchOperation],
) -> Result<TxOutcome, SqlMiddlewareDbError> {
    let escapes = EscapeMode::from(pool.db_type());
    let mut tx = pool.begin().await?;
    let mut results = Vec::with_capacity(operations.len());

    for (index, op) in operations.iter().enumerate() {
        match run_one(&mut tx, binding, op, escapes).await {
            Ok(outcome) => results.push(outcome),
            Err(err) => {
                tracing::debug!(index, kind = op.kind(), "batch operation failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback after failed batch operation");
                }
                return Err(err);
            }
        }
    }

    tx.commit().await?;
    Ok(TxOutcome::new(results))
}

async fn run_one<E: StatementExecutor>(
    executor: &mut E,
    binding: &TableBinding,
    op: &BatchOperation,
    escapes: EscapeMode,
) -> Result<WriteOutcome, SqlMiddlewareDbError> {
    let stmt = op.statement(binding);
    crate::logging::log_statement("DoTransactions", binding.handle(), &stmt);
    let (sql, params) = if op.expands_lists() {
        expand_placeholders_with(&stmt.sql, &stmt.params, escapes)?
    } else {
        (
            Cow::Borrowed(stmt.sql.as_str()),
            Cow::Borrowed(stmt.params.as_slice()),
        )
    };
    executor.execute_write(&sql, &params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_map;
    use crate::types::RowValues;

    fn binding() -> TableBinding {
        TableBinding::new("db", "orders", "shop_")
    }

    #[test]
    fn with_table_retargets_every_kind() {
        let ins = BatchOperation::insert(data_map! { "a" => 1_i64 }).with_table("log");
        assert_eq!(
            ins.statement(&binding()).sql,
            "INSERT INTO shop_log (a) VALUES (?)"
        );

        let batch = BatchOperation::batch_insert(["a"], vec![data_map! { "a" => 1_i64 }])
            .with_table("log");
        assert_eq!(
            batch.statement(&binding()).sql,
            "INSERT INTO shop_log (a) VALUES (?)"
        );

        let upd = BatchOperation::update(Condition::new(), data_map! { "a" => 2_i64 })
            .with_table("log");
        assert_eq!(upd.statement(&binding()).sql, "UPDATE shop_log SET a = ?");

        let del = BatchOperation::delete(Condition::new().filter("a = ?").bind(1_i64))
            .with_table("log");
        assert_eq!(
            del.statement(&binding()).sql,
            "DELETE FROM shop_log WHERE a = ?"
        );
    }

    #[test]
    fn statement_uses_bound_table_by_default() {
        let op = BatchOperation::delete(Condition::new().filter("id IN (?)").bind(vec![1_i64, 2]));
        let stmt = op.statement(&binding());
        assert_eq!(stmt.sql, "DELETE FROM shop_orders WHERE id IN (?)");
        assert_eq!(
            stmt.params,
            vec![RowValues::List(vec![RowValues::Int(1), RowValues::Int(2)])]
        );
        assert!(op.expands_lists());
        assert!(!BatchOperation::insert(DataMap::new()).expands_lists());
    }
}
