//! In-memory representation of a tab-separated frame table.
//!
//! Cells are kept as the raw text read from disk. Only the angular column is
//! ever parsed, so every other column is written back exactly as it was read.

use crate::error::{Result, ShortenError};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A named column of raw cell text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Header text of the column
    pub name: String,
    /// One cell per row
    pub values: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An ordered collection of equally long named columns.
///
/// `index` holds the position each row had in the source file, so a sliced
/// table still knows where its rows came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn with_header<I, S>(name: impl Into<String>, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: header
                .into_iter()
                .map(|h| Column::new(h, Vec::new()))
                .collect(),
            index: Vec::new(),
        }
    }

    /// Build a table from whole columns. Rows are labelled `0..n`.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);

        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(ShortenError::Malformed {
                table: name,
                line: 0,
                reason: format!(
                    "column `{}` has {} rows, expected {rows}",
                    bad.name,
                    bad.values.len()
                ),
            });
        }

        Ok(Self {
            name,
            columns,
            index: (0..rows).collect(),
        })
    }

    /// Logical name used in log lines and errors (e.g. "trajectories").
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Source row labels, one per row.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Look up a column by header name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn position_of(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| ShortenError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Append one row. The row must have one cell per column.
    pub fn push_row(&mut self, label: usize, cells: Vec<String>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(ShortenError::Malformed {
                table: self.name.clone(),
                line: label,
                reason: format!(
                    "expected {} fields, found {}",
                    self.columns.len(),
                    cells.len()
                ),
            });
        }

        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.values.push(cell);
        }
        self.index.push(label);
        Ok(())
    }

    /// Cells of one row in column order.
    pub fn row(&self, position: usize) -> Option<Vec<&str>> {
        if position >= self.row_count() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| c.values[position].as_str())
                .collect(),
        )
    }

    /// Copy the rows at `range` into a new table with the same columns.
    ///
    /// The range is clamped to the table, so an out-of-bounds range yields
    /// fewer rows or none at all.
    pub fn slice_rows(&self, range: Range<usize>) -> Table {
        let end = range.end.min(self.row_count());
        let start = range.start.min(end);

        Table {
            name: self.name.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values[start..end].to_vec()))
                .collect(),
            index: self.index[start..end].to_vec(),
        }
    }

    /// Parse a column as finite floating point numbers.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = &self.columns[self.position_of(name)?];

        column
            .values
            .iter()
            .zip(&self.index)
            .map(|(cell, &row)| match cell.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(ShortenError::InvalidValue {
                    column: name.to_string(),
                    row,
                    value: cell.clone(),
                }),
            })
            .collect()
    }

    /// Replace the values of a column, keeping its name and position.
    pub fn replace_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        let position = self.position_of(name)?;

        if values.len() != self.row_count() {
            return Err(ShortenError::Malformed {
                table: self.name.clone(),
                line: 0,
                reason: format!(
                    "replacement for `{name}` has {} rows, expected {}",
                    values.len(),
                    self.row_count()
                ),
            });
        }

        self.columns[position].values = values;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table(rows: usize) -> Table {
        let frames: Vec<String> = (0..rows).map(|i| i.to_string()).collect();
        let heading: Vec<String> = (0..rows).map(|i| format!("{}.5", i % 360)).collect();
        Table::from_columns(
            "trajectories",
            vec![
                Column::new("frame", frames),
                Column::new("head_direction.value", heading),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_columns_rejects_ragged_columns() {
        let result = Table::from_columns(
            "t",
            vec![
                Column::new("a", vec!["1".into(), "2".into()]),
                Column::new("b", vec!["1".into()]),
            ],
        );
        assert!(matches!(result, Err(ShortenError::Malformed { .. })));
    }

    #[test]
    fn test_slice_rows_keeps_labels() {
        let table = sample_table(10);
        let slice = table.slice_rows(3..6);

        assert_eq!(slice.row_count(), 3);
        assert_eq!(slice.index(), &[3, 4, 5]);
        assert_eq!(slice.row(0), Some(vec!["3", "3.5"]));
    }

    #[test]
    fn test_slice_rows_clamps() {
        let table = sample_table(10);

        assert_eq!(table.slice_rows(8..20).row_count(), 2);

        let empty = table.slice_rows(50..60);
        assert!(empty.is_empty());
        assert_eq!(empty.column_count(), 2);
    }

    #[test]
    fn test_numeric_column() {
        let table = sample_table(3);
        let values = table.numeric_column("head_direction.value").unwrap();
        assert_eq!(values, vec![0.5, 1.5, 2.5]);

        let err = table.numeric_column("nope").unwrap_err();
        assert!(err.is_missing_input());
    }

    #[test]
    fn test_numeric_column_rejects_non_finite() {
        let table = Table::from_columns(
            "t",
            vec![Column::new("angle", vec!["10".into(), "".into(), "nan".into()])],
        )
        .unwrap();

        match table.numeric_column("angle") {
            Err(ShortenError::InvalidValue { row, .. }) => assert_eq!(row, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_replace_column_keeps_position() {
        let mut table = sample_table(2);
        table
            .replace_column("frame", vec!["a".into(), "b".into()])
            .unwrap();

        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["frame", "head_direction.value"]);
        assert_eq!(table.row(1), Some(vec!["b", "1.5"]));

        assert!(table.replace_column("frame", vec![]).is_err());
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut table = Table::with_header("t", ["a", "b"]);
        table.push_row(0, vec!["1".into(), "2".into()]).unwrap();
        assert!(table.push_row(1, vec!["1".into()]).is_err());
        assert_eq!(table.row_count(), 1);
    }
}
