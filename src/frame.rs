//! An in-memory table for bulk result consumption.

use serde_json::Value as JsonValue;

use crate::results::{ResultSet, SqlRow};
use crate::values::SqlValue;

/// Named columns by ordered rows, the bulk-consumption counterpart of
/// [`ResultSet`]. A statement that returns no rows loads as an empty frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl DataFrame {
    /// A frame with no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Column names, in select order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, named column).
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// All values of one column, top to bottom.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&SqlValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }

    /// Rows as value slices, in result order.
    pub fn rows(&self) -> impl Iterator<Item = &[SqlValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Render the frame as a JSON array of one object per row, pandas
    /// `to_json(orient="records")` style.
    #[must_use]
    pub fn to_json_rows(&self) -> JsonValue {
        JsonValue::Array(
            self.rows
                .iter()
                .map(|row| {
                    self.columns
                        .iter()
                        .zip(row)
                        .map(|(name, value)| (name.clone(), value.to_json()))
                        .collect::<serde_json::Map<_, _>>()
                        .into()
                })
                .collect(),
        )
    }
}

impl From<ResultSet> for DataFrame {
    fn from(rs: ResultSet) -> Self {
        let columns = rs.columns().to_vec();
        let rows = rs
            .into_rows()
            .into_iter()
            .map(SqlRow::into_values)
            .collect();
        Self { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ResultSet, SqlRow};
    use std::sync::Arc;

    fn frame() -> DataFrame {
        let columns = Arc::new(vec!["x".to_string(), "y".to_string()]);
        let mut rs = ResultSet::new(columns.clone(), 2);
        rs.push(SqlRow::new(
            columns.clone(),
            vec![SqlValue::Int(1), SqlValue::Text("a".into())],
        ));
        rs.push(SqlRow::new(
            columns,
            vec![SqlValue::Int(2), SqlValue::Null],
        ));
        DataFrame::from(rs)
    }

    #[test]
    fn shape_and_cell_access() {
        let df = frame();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.get(0, "x"), Some(&SqlValue::Int(1)));
        assert_eq!(df.get(1, "y"), Some(&SqlValue::Null));
        assert_eq!(df.get(0, "z"), None);
    }

    #[test]
    fn column_extraction() {
        let df = frame();
        let xs = df.column("x").unwrap();
        assert_eq!(xs, vec![&SqlValue::Int(1), &SqlValue::Int(2)]);
    }

    #[test]
    fn empty_frame_has_no_shape() {
        let df = DataFrame::empty();
        assert_eq!(df.shape(), (0, 0));
        assert!(df.is_empty());
    }

    #[test]
    fn zero_row_result_keeps_column_names() {
        let columns = Arc::new(vec!["x".to_string(), "y".to_string()]);
        let df = DataFrame::from(ResultSet::new(columns, 0));
        assert_eq!(df.shape(), (0, 2));
        assert_eq!(df.columns(), ["x", "y"]);
        assert_eq!(df.column("x"), Some(vec![]));
    }

    #[test]
    fn json_records_rendering() {
        let df = frame();
        assert_eq!(
            df.to_json_rows(),
            serde_json::json!([
                {"x": 1, "y": "a"},
                {"x": 2, "y": null},
            ])
        );
    }
}
