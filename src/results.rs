//! Row and result-set types returned by the row-oriented query path.

use std::sync::Arc;

use crate::values::SqlValue;

/// One row of a query result. Column names are shared across all rows of a
/// result set, so lookups by name stay cheap without per-row allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRow {
    columns: Arc<Vec<String>>,
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub(crate) fn new(columns: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    /// Column names, in select order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Value of the named column, or `None` when the column does not exist.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// All values in select order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub(crate) fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// An ordered collection of rows from a single statement. Column names are
/// stored on the set itself, so a query matching zero rows still knows its
/// columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Arc<Vec<String>>,
    rows: Vec<SqlRow>,
}

impl ResultSet {
    pub(crate) fn new(columns: Arc<Vec<String>>, capacity: usize) -> Self {
        Self {
            columns,
            rows: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, row: SqlRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[SqlRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SqlRow> {
        self.rows.iter()
    }

    /// Column names, in select order. Present even when no row matched.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn into_rows(self) -> Vec<SqlRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SqlRow;
    type IntoIter = std::slice::Iter<'a, SqlRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = SqlRow;
    type IntoIter = std::vec::IntoIter<SqlRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: Vec<SqlValue>) -> SqlRow {
        SqlRow::new(
            Arc::new(vec!["a".to_string(), "b".to_string()]),
            values,
        )
    }

    #[test]
    fn lookup_by_name_and_index() {
        let r = row(vec![SqlValue::Int(1), SqlValue::Text("x".into())]);
        assert_eq!(r.get("a"), Some(&SqlValue::Int(1)));
        assert_eq!(r.get_by_index(1), Some(&SqlValue::Text("x".into())));
        assert_eq!(r.get("missing"), None);
    }

    #[test]
    fn result_set_keeps_columns_without_rows() {
        let columns = Arc::new(vec!["a".to_string(), "b".to_string()]);
        let mut rs = ResultSet::new(columns, 4);
        assert_eq!(rs.columns(), ["a", "b"]);
        assert!(rs.is_empty());

        rs.push(row(vec![SqlValue::Int(1), SqlValue::Int(2)]));
        assert_eq!(rs.columns(), ["a", "b"]);
        assert_eq!(rs.len(), 1);
    }
}
