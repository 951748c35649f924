use crate::condition::Condition;

use super::{Statement, TableBinding};

impl TableBinding {
    /// Read query shared by count, find-one, find and find-all.
    ///
    /// Clause order: `SELECT`, `FROM` (aliased `AS a` when joins are present),
    /// joins, `WHERE`, `GROUP BY`, `ORDER BY`, `LIMIT`, `OFFSET`. Binds are the
    /// condition's binds untouched.
    ///
    /// `LIMIT` always precedes `OFFSET`: `OFFSET m LIMIT n` is a syntax error on
    /// both `MySQL` and `SQLite`.
    #[must_use]
    pub fn build_query(&self, condition: &Condition) -> Statement {
        let mut clauses = Vec::with_capacity(8 + condition.join.len());

        clauses.push(format!(
            "SELECT {}",
            condition.select.as_deref().unwrap_or("*")
        ));

        let table = self.qualified(condition.table.as_deref());
        if condition.join.is_empty() {
            clauses.push(format!("FROM {table}"));
        } else {
            clauses.push(format!("FROM {table} AS a"));
            clauses.extend(condition.join.iter().cloned());
        }

        if let Some(where_clause) = &condition.where_clause {
            clauses.push(format!("WHERE {where_clause}"));
        }
        if let Some(group) = &condition.group {
            clauses.push(format!("GROUP BY {group}"));
        }
        if let Some(order) = &condition.order {
            clauses.push(format!("ORDER BY {order}"));
        }
        if let Some(limit) = condition.limit {
            clauses.push(format!("LIMIT {limit}"));
        }
        if let Some(offset) = condition.offset {
            clauses.push(format!("OFFSET {offset}"));
        }

        Statement::new(clauses.join(" "), condition.binds.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowValues;

    fn binding() -> TableBinding {
        TableBinding::new("db", "users", "app_")
    }

    #[test]
    fn empty_condition_selects_everything() {
        let stmt = binding().build_query(&Condition::new());
        assert_eq!(stmt.sql, "SELECT * FROM app_users");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn full_clause_order() {
        let cond = Condition::new()
            .select("a.id, b.total")
            .join("LEFT JOIN app_orders AS b ON b.uid = a.id")
            .join("LEFT JOIN app_tags AS c ON c.uid = a.id AND c.kind = ?")
            .filter("a.age > ?")
            .group_by("a.id")
            .order_by("a.id DESC")
            .offset(20)
            .limit(10)
            .bind("vip")
            .bind(18_i64);
        let stmt = binding().build_query(&cond);
        assert_eq!(
            stmt.sql,
            "SELECT a.id, b.total FROM app_users AS a \
             LEFT JOIN app_orders AS b ON b.uid = a.id \
             LEFT JOIN app_tags AS c ON c.uid = a.id AND c.kind = ? \
             WHERE a.age > ? GROUP BY a.id ORDER BY a.id DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(
            stmt.params,
            vec![RowValues::Text("vip".into()), RowValues::Int(18)]
        );
    }

    #[test]
    fn count_and_find_one_overwrite_caller_values() {
        let cond = Condition::new().select("name").limit(30).filter("age = ?").bind(3_i64);

        let count = binding().build_query(&cond.clone().for_count(None));
        assert_eq!(count.sql, "SELECT COUNT(*) FROM app_users WHERE age = ? LIMIT 30");

        let count_col = binding().build_query(&cond.clone().for_count(Some("id")));
        assert!(count_col.sql.starts_with("SELECT COUNT(id) FROM"));

        let one = binding().build_query(&cond.for_find_one());
        assert_eq!(one.sql, "SELECT name FROM app_users WHERE age = ? LIMIT 1");
    }

    #[test]
    fn table_from_condition() {
        let stmt = binding().build_query(&Condition::new().table("logs"));
        assert_eq!(stmt.sql, "SELECT * FROM app_logs");
    }
}
