use crate::types::RowValues;

mod dml;
mod select;

/// SQL text with `?` placeholders plus the binds in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<RowValues>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: String, params: Vec<RowValues>) -> Self {
        Self { sql, params }
    }
}

/// Handle name, default table and the handle's table prefix.
///
/// Builders are pure: they only read the binding and their inputs, and every
/// emitted table name is `<prefix><table>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBinding {
    handle: String,
    table: String,
    prefix: String,
}

impl TableBinding {
    #[must_use]
    pub fn new(
        handle: impl Into<String>,
        table: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            handle: handle.into(),
            table: table.into(),
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn qualified(&self, table_override: Option<&str>) -> String {
        format!(
            "{}{}",
            self.prefix,
            table_override.unwrap_or(self.table.as_str())
        )
    }
}
