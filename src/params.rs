//! Named query parameters and their translation to driver placeholders.
//!
//! Queries are written with `:name` placeholders; Tiberius only understands
//! positional `@PN` placeholders, so [`bind_named`] rewrites the SQL and
//! lines the values up in placeholder order. The scanner is aware of T-SQL
//! quoting (`'...'` strings with doubled-quote escapes, `"..."` and `[...]`
//! identifiers), `--` line comments and nested `/* */` block comments, so a
//! colon inside any of those is left alone.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::DbClientError;
use crate::values::SqlValue;

/// An ordered name-to-value mapping for query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlParams {
    values: BTreeMap<String, SqlValue>,
}

impl SqlParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SqlParams
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = SqlParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Bracketed,
    LineComment,
    BlockComment(u32),
}

/// Rewrite `:name` placeholders into `@P1`, `@P2`, ... and return the values
/// in placeholder order, ready to bind.
///
/// Repeated names reuse one placeholder number. Returns a borrowed `Cow`
/// when the SQL contains no named placeholders. Parameters present in the
/// mapping but unused by the SQL are ignored.
///
/// # Errors
///
/// `DbClientError::ParameterError` when the SQL names a parameter that the
/// mapping does not contain.
pub fn bind_named<'a, 'p>(
    sql: &'a str,
    params: &'p SqlParams,
) -> Result<(Cow<'a, str>, Vec<&'p SqlValue>), DbClientError> {
    let bytes = sql.as_bytes();
    let mut state = State::Normal;
    let mut out = String::new();
    let mut copied = 0usize;
    let mut ordered: Vec<(&str, &'p SqlValue)> = Vec::new();
    let mut idx = 0usize;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'[' => state = State::Bracketed,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b':' if bytes.get(idx + 1) == Some(&b':') => {
                    // `::` is never a placeholder
                    idx += 1;
                }
                b':' => {
                    if let Some((name, end)) = scan_ident(sql, idx + 1) {
                        let position = match ordered.iter().position(|(n, _)| *n == name) {
                            Some(p) => p,
                            None => {
                                let value = params.get(name).ok_or_else(|| {
                                    DbClientError::ParameterError(format!(
                                        "no value supplied for parameter :{name}"
                                    ))
                                })?;
                                ordered.push((name, value));
                                ordered.len() - 1
                            }
                        };
                        out.push_str(&sql[copied..idx]);
                        let _ = write!(out, "@P{}", position + 1);
                        copied = end;
                        idx = end;
                        continue;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // doubled quote stays inside the string
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Bracketed => {
                if b == b']' {
                    if bytes.get(idx + 1) == Some(&b']') {
                        idx += 1; // ]] escapes inside bracketed identifiers
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
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    let values = ordered.into_iter().map(|(_, v)| v).collect();
    if copied == 0 {
        Ok((Cow::Borrowed(sql), values))
    } else {
        out.push_str(&sql[copied..]);
        Ok((Cow::Owned(out), values))
    }
}

/// Scan an identifier starting at `start`; returns the name and the byte
/// offset one past its end. Identifiers begin with a letter or underscore.
fn scan_ident(sql: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = sql.as_bytes();
    let first = *bytes.get(start)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
    }
    Some((&sql[start..end], end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_in_placeholder_order() {
        let params = SqlParams::new().with("name", "alice").with("age", 42i64);
        let (sql, values) =
            bind_named("SELECT * FROM t WHERE name = :name AND age > :age", &params).unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE name = @P1 AND age > @P2");
        assert_eq!(values[0], &SqlValue::Text("alice".into()));
        assert_eq!(values[1], &SqlValue::Int(42));
    }

    #[test]
    fn repeated_names_share_a_placeholder() {
        let params = SqlParams::new().with("v", 1i64);
        let (sql, values) = bind_named("SELECT :v AS a, :v AS b", &params).unwrap();
        assert_eq!(sql, "SELECT @P1 AS a, @P1 AS b");
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn colons_inside_quotes_comments_and_brackets_survive() {
        let params = SqlParams::new().with("v", 1i64);
        let (sql, values) = bind_named(
            "SELECT ':not', \":not\", [a:b], :v -- :not\n/* :not /* :not */ */ FROM t",
            &params,
        )
        .unwrap();
        assert_eq!(
            sql,
            "SELECT ':not', \":not\", [a:b], @P1 -- :not\n/* :not /* :not */ */ FROM t"
        );
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn doubled_quote_escapes_keep_string_state() {
        let params = SqlParams::new().with("v", 1i64);
        let (sql, _) = bind_named("SELECT 'it''s :not', :v", &params).unwrap();
        assert_eq!(sql, "SELECT 'it''s :not', @P1");
    }

    #[test]
    fn double_colon_is_not_a_placeholder() {
        let params = SqlParams::new();
        let (sql, values) = bind_named("SELECT x::text FROM t", &params).unwrap();
        assert!(matches!(sql, Cow::Borrowed(_)));
        assert_eq!(sql, "SELECT x::text FROM t");
        assert!(values.is_empty());
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let err = bind_named("SELECT :gone", &SqlParams::new()).unwrap_err();
        assert!(matches!(err, DbClientError::ParameterError(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn sql_without_placeholders_borrows() {
        let params = SqlParams::new().with("unused", 1i64);
        let (sql, values) = bind_named("SELECT 1", &params).unwrap();
        assert!(matches!(sql, Cow::Borrowed(_)));
        assert!(values.is_empty());
    }
}
