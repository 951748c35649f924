use indexmap::IndexMap;

use crate::expr::FieldValue;
use crate::types::RowValues;

/// Clauses for a read, update or delete.
///
/// Every clause is an SQL fragment supplied by the caller; only `binds` are
/// parameterized. `binds` must follow the left-to-right order of the `?`
/// placeholders across `join` and `where`, which is not checked.
///
/// ```rust
/// use sql_crud_middleware::prelude::*;
///
/// let cond = Condition::new()
///     .filter("status = ? AND id IN (?)")
///     .bind("paid")
///     .bind(vec![1_i64, 2, 3])
///     .order_by("id DESC")
///     .limit(20);
/// assert_eq!(cond.binds.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub select: Option<String>,
    pub table: Option<String>,
    pub join: Vec<String>,
    pub where_clause: Option<String>,
    pub group: Option<String>,
    pub order: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub binds: Vec<RowValues>,
}

impl Condition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Append one JOIN clause, emitted verbatim. Any join aliases the base table as `a`.
    #[must_use]
    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.join.push(join.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }

    #[must_use]
    pub fn group_by(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn bind(mut self, value: impl Into<RowValues>) -> Self {
        self.binds.push(value.into());
        self
    }

    #[must_use]
    pub fn binds(mut self, values: Vec<RowValues>) -> Self {
        self.binds.extend(values);
        self
    }

    /// Projection forced to `COUNT(*)` or `COUNT(<column>)`; replaces any `select`.
    #[must_use]
    pub fn for_count(mut self, column: Option<&str>) -> Self {
        self.select = Some(match column {
            Some(col) => format!("COUNT({col})"),
            None => "COUNT(*)".to_owned(),
        });
        self
    }

    /// Limit forced to 1; replaces any `limit`.
    #[must_use]
    pub fn for_find_one(mut self) -> Self {
        self.limit = Some(1);
        self
    }
}

/// Column → value pairs for inserts and updates, kept in insertion order so
/// the generated column list is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataMap(IndexMap<String, FieldValue>);

impl DataMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column; re-setting an existing column replaces its value in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(column.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.0.get(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for DataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DataMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build a [`DataMap`] from `column => value` pairs.
///
/// ```rust
/// use sql_crud_middleware::{data_map, prelude::*};
///
/// let row = data_map! { "name" => "widget", "price" => 9.5 };
/// assert_eq!(row.len(), 2);
/// ```
#[macro_export]
macro_rules! data_map {
    () => { $crate::condition::DataMap::new() };
    ($($col:expr => $val:expr),+ $(,)?) => {{
        let mut map = $crate::condition::DataMap::new();
        $( map.insert($col, $val); )+
        map
    }};
}
