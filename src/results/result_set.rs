use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::row::{CustomDbRow, index_columns};
use crate::error::SqlMiddlewareDbError;
use crate::types::RowValues;

/// A result set from a database query
///
/// Rows share one column-name list and one name → index map.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    /// The number of rows read
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            ..ResultSet::default()
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index_cache = Arc::new(index_columns(&column_names));
        self.column_names = Some(column_names);
    }

    /// Get the column names for this result set
    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row to the result set; ignored until column names are set.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let Some(column_names) = &self.column_names {
            self.results.push(CustomDbRow {
                column_names: Arc::clone(column_names),
                rows: row_values,
                column_index_cache: Arc::clone(&self.column_index_cache),
            });
            self.rows_affected += 1;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// First column of the first row.
    #[must_use]
    pub fn scalar(&self) -> Option<&RowValues> {
        self.results.first().and_then(|row| row.get_by_index(0))
    }

    /// Scan every row into `T`.
    ///
    /// # Errors
    /// Returns `SqlMiddlewareDbError::DecodeError` on the first row that does not fit `T`.
    pub fn deserialize_rows<T: DeserializeOwned>(&self) -> Result<Vec<T>, SqlMiddlewareDbError> {
        self.results.iter().map(CustomDbRow::deserialize).collect()
    }
}
