use crate::types::RowValues;

/// Raw SQL fragment with its own bind values, usable as a column value in an
/// update (`price = price * ? + ?`).
///
/// ```rust
/// use sql_crud_middleware::prelude::*;
///
/// let bump = Expr::new("price * ? + ?", vec![RowValues::Int(2), RowValues::Int(100)]);
/// assert_eq!(bump.sql(), "price * ? + ?");
/// assert_eq!(bump.binds().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    sql: String,
    binds: Vec<RowValues>,
}

impl Expr {
    #[must_use]
    pub fn new(sql: impl Into<String>, binds: Vec<RowValues>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    /// Fragment without binds (`updated_at = NOW()`).
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn binds(&self) -> &[RowValues] {
        &self.binds
    }
}

/// Value stored against a column in a [`DataMap`](crate::condition::DataMap).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Bound as a single `?`.
    Value(RowValues),
    /// Emitted verbatim with its own binds spliced in.
    Expr(Expr),
}

impl From<Expr> for FieldValue {
    fn from(value: Expr) -> Self {
        FieldValue::Expr(value)
    }
}

impl From<RowValues> for FieldValue {
    fn from(value: RowValues) -> Self {
        FieldValue::Value(value)
    }
}

macro_rules! field_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Value(RowValues::from(value))
                }
            }
        )*
    };
}

field_value_from!(
    i64,
    i32,
    u32,
    f64,
    bool,
    String,
    &str,
    chrono::NaiveDateTime,
    serde_json::Value,
);

impl<T: Into<RowValues>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        FieldValue::Value(RowValues::from(value))
    }
}
