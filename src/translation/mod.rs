use std::borrow::Cow;

use crate::error::SqlMiddlewareDbError;
use crate::types::{DatabaseType, RowValues};

mod parsers;
mod scanner;

use parsers::{is_block_comment_end, is_block_comment_start, is_line_comment_start};
use scanner::{State, closing_quote};

/// Statement text and binds after list expansion.
pub type Expanded<'a> = (Cow<'a, str>, Cow<'a, [RowValues]>);

/// How quoted text may escape its closing quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// Only a doubled quote escapes (`'it''s'`); `\` is an ordinary byte. `SQLite`.
    #[default]
    Standard,
    /// A backslash also escapes the next byte (`'it\'s'`). `MySQL`.
    Backslash,
}

impl From<DatabaseType> for EscapeMode {
    fn from(db_type: DatabaseType) -> Self {
        match db_type {
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => EscapeMode::Standard,
            #[cfg(feature = "mysql")]
            DatabaseType::Mysql => EscapeMode::Backslash,
        }
    }
}

/// Expand list binds into one placeholder per element.
///
/// Each `?` outside quoted text and comments consumes one bind. A
/// [`RowValues::List`] of N elements turns its `?` into `?,?,…` (N times) and
/// is flattened into N binds at that position; the caller writes the
/// surrounding parentheses (`id IN (?)`). Statements without list binds are
/// returned borrowed and unchecked.
///
/// ```rust
/// use sql_crud_middleware::prelude::*;
///
/// let params = [RowValues::Text("paid".into()), RowValues::from(vec![1_i64, 2, 3])];
/// let (sql, binds) = expand_placeholders("status = ? AND id IN (?)", &params)?;
/// assert_eq!(sql, "status = ? AND id IN (?,?,?)");
/// assert_eq!(binds.len(), 4);
/// # Ok::<(), SqlMiddlewareDbError>(())
/// ```
///
/// Quoted text follows [`EscapeMode::Standard`]; use
/// [`expand_placeholders_with`] for `MySQL`'s backslash escapes.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::ParameterError` when a list is empty or
/// nested, or when placeholders and binds do not pair up one-to-one.
pub fn expand_placeholders<'a>(
    sql: &'a str,
    params: &'a [RowValues],
) -> Result<Expanded<'a>, SqlMiddlewareDbError> {
    expand_placeholders_with(sql, params, EscapeMode::Standard)
}

/// [`expand_placeholders`] with the backend's quoting rules.
///
/// # Errors
/// Same as [`expand_placeholders`].
pub fn expand_placeholders_with<'a>(
    sql: &'a str,
    params: &'a [RowValues],
    escapes: EscapeMode,
) -> Result<Expanded<'a>, SqlMiddlewareDbError> {
    if !params.iter().any(RowValues::is_list) {
        return Ok((Cow::Borrowed(sql), Cow::Borrowed(params)));
    }

    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + params.len() * 2);
    let mut flat = Vec::with_capacity(params.len());
    let mut state = State::Normal;
    let mut next_param = 0;
    let mut copied_to = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::Backticked,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment;
                    idx += 1;
                }
                b'?' => {
                    let param = params.get(next_param).ok_or_else(|| {
                        SqlMiddlewareDbError::ParameterError(format!(
                            "statement has more placeholders than the {} binds supplied",
                            params.len()
                        ))
                    })?;
                    next_param += 1;
                    out.push_str(&sql[copied_to..idx]);
                    copied_to = idx + 1;
                    push_bind(param, &mut out, &mut flat)?;
                }
                _ => {}
            },
            State::SingleQuoted | State::DoubleQuoted | State::Backticked => {
                let quote = closing_quote(state);
                let escaped = escapes == EscapeMode::Backslash && state != State::Backticked;
                if b == b'\\' && escaped {
                    idx += 1; // skip escaped byte
                } else if Some(b) == quote {
                    if bytes.get(idx + 1) == Some(&b) {
                        idx += 1; // skip doubled quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if is_block_comment_end(bytes, idx) {
                    state = State::Normal;
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    if next_param != params.len() {
        return Err(SqlMiddlewareDbError::ParameterError(format!(
            "{} binds supplied for {next_param} placeholders",
            params.len()
        )));
    }

    out.push_str(&sql[copied_to..]);
    Ok((Cow::Owned(out), Cow::Owned(flat)))
}

fn push_bind(
    param: &RowValues,
    out: &mut String,
    flat: &mut Vec<RowValues>,
) -> Result<(), SqlMiddlewareDbError> {
    match param {
        RowValues::List(items) if items.is_empty() => Err(SqlMiddlewareDbError::ParameterError(
            "empty list bound to a placeholder".into(),
        )),
        RowValues::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if item.is_list() {
                    return Err(SqlMiddlewareDbError::ParameterError(
                        "nested list bound to a placeholder".into(),
                    ));
                }
                if i > 0 {
                    out.push(',');
                }
                out.push('?');
                flat.push(item.clone());
            }
            Ok(())
        }
        other => {
            out.push('?');
            flat.push(other.clone());
            Ok(())
        }
    }
}
