use crate::condition::{Condition, DataMap};
use crate::expr::FieldValue;
use crate::types::RowValues;

use super::{Statement, TableBinding};

impl TableBinding {
    /// `INSERT INTO <prefix><table> (<cols>) VALUES (?,…)`, one placeholder per column.
    ///
    /// An expression value takes its column's slot verbatim (`NOW()`) and
    /// contributes its own binds there.
    #[must_use]
    pub fn build_insert(&self, data: &DataMap, table: Option<&str>) -> Statement {
        let mut columns = Vec::with_capacity(data.len());
        let mut placeholders = Vec::with_capacity(data.len());
        let mut params = Vec::with_capacity(data.len());

        for (column, value) in data.iter() {
            columns.push(column);
            placeholders.push(value_slot(value, &mut params));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.qualified(table),
            columns.join(","),
            placeholders.join(",")
        );
        Statement::new(sql, params)
    }

    /// Multi-row insert projected onto `columns`.
    ///
    /// Row keys outside `columns` are ignored and missing keys bind `NULL`. An
    /// empty `rows` produces invalid SQL that the driver rejects.
    #[must_use]
    pub fn build_batch_insert(
        &self,
        columns: &[String],
        rows: &[DataMap],
        table: Option<&str>,
    ) -> Statement {
        let mut groups = Vec::with_capacity(rows.len());
        let mut params = Vec::with_capacity(rows.len() * columns.len());

        for row in rows {
            let slots: Vec<&str> = columns
                .iter()
                .map(|column| match row.get(column) {
                    Some(value) => value_slot(value, &mut params),
                    None => {
                        params.push(RowValues::Null);
                        "?"
                    }
                })
                .collect();
            groups.push(format!("({})", slots.join(",")));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.qualified(table),
            columns.join(","),
            groups.join(",")
        );
        Statement::new(sql, params)
    }

    /// `UPDATE … SET … [WHERE …]`.
    ///
    /// SET binds (expression binds included, in their own order) always come
    /// before the condition's binds. No WHERE means every row is updated.
    #[must_use]
    pub fn build_update(&self, condition: &Condition, data: &DataMap) -> Statement {
        let mut clauses = vec![format!(
            "UPDATE {}",
            self.qualified(condition.table.as_deref())
        )];
        let mut set = Vec::with_capacity(data.len());
        let mut params = Vec::with_capacity(data.len() + condition.binds.len());

        for (column, value) in data.iter() {
            match value {
                FieldValue::Expr(expr) => {
                    set.push(format!("{column} = {}", expr.sql()));
                    params.extend(expr.binds().iter().cloned());
                }
                FieldValue::Value(v) => {
                    set.push(format!("{column} = ?"));
                    params.push(v.clone());
                }
            }
        }
        clauses.push(format!("SET {}", set.join(",")));

        if let Some(where_clause) = &condition.where_clause {
            clauses.push(format!("WHERE {where_clause}"));
        }
        params.extend(condition.binds.iter().cloned());

        Statement::new(clauses.join(" "), params)
    }

    /// `DELETE FROM <prefix><table> [WHERE …]` with the condition's binds verbatim.
    #[must_use]
    pub fn build_delete(&self, condition: &Condition) -> Statement {
        let mut clauses = vec![format!(
            "DELETE FROM {}",
            self.qualified(condition.table.as_deref())
        )];
        if let Some(where_clause) = &condition.where_clause {
            clauses.push(format!("WHERE {where_clause}"));
        }
        Statement::new(clauses.join(" "), condition.binds.clone())
    }
}

fn value_slot<'a>(value: &'a FieldValue, params: &mut Vec<RowValues>) -> &'a str {
    match value {
        FieldValue::Value(v) => {
            params.push(v.clone());
            "?"
        }
        FieldValue::Expr(expr) => {
            params.extend(expr.binds().iter().cloned());
            expr.sql()
        }
    }
}
