//! Frame window extraction.
//!
//! A window is a half-open range of row positions `[start, start + length)`
//! applied identically to every table of a session, so the trajectory and
//! trial-info rows stay aligned.

use crate::error::{Result, ShortenError};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, warn};

/// Default first frame of the window.
pub const DEFAULT_START_FRAME: usize = 10_000;

/// Default number of frames in the window.
pub const DEFAULT_N_FRAMES: usize = 900;

/// A contiguous range of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Position of the first row
    pub start: usize,
    /// Number of rows requested
    pub length: usize,
}

impl WindowSpec {
    /// Create a window. `length` must be greater than zero.
    pub fn new(start: usize, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(ShortenError::invalid_parameter(
                "n_frames",
                "window length must be greater than 0",
            ));
        }
        Ok(Self { start, length })
    }

    /// Exclusive end position, saturating on overflow.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    /// The requested row range, before clamping to a table.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Number of rows this window selects from a table of `rows` rows.
    pub fn rows_available(&self, rows: usize) -> usize {
        self.end().min(rows).saturating_sub(self.start)
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_FRAME,
            length: DEFAULT_N_FRAMES,
        }
    }
}

/// Extract the rows of `table` that fall in `window`.
///
/// Column order and row order are preserved. A window running past the end
/// of the table is truncated; one starting past the end yields an empty table
/// with the same columns.
pub fn extract(table: &Table, window: WindowSpec) -> Table {
    let available = window.rows_available(table.row_count());

    if available == 0 {
        warn!(
            table = table.name(),
            rows = table.row_count(),
            start = window.start,
            "window starts beyond the end of the table"
        );
    } else if available < window.length {
        debug!(
            table = table.name(),
            requested = window.length,
            available,
            "window truncated at end of table"
        );
    }

    table.slice_rows(window.range())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn numbered_table(rows: usize) -> Table {
        Table::from_columns(
            "trajectories",
            vec![
                Column::new("frame", (0..rows).map(|i| i.to_string()).collect()),
                Column::new(
                    "head_direction.value",
                    (0..rows).map(|i| format!("{}", (i * 7) % 360)).collect(),
                ),
                Column::new("speed", (0..rows).map(|i| format!("{i}.25")).collect()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_window_creation() {
        let window = WindowSpec::new(10, 5).unwrap();
        assert_eq!(window.range(), 10..15);
        assert_eq!(window.end(), 15);
        assert_eq!(window.rows_available(12), 2);
        assert_eq!(window.rows_available(100), 5);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            WindowSpec::new(0, 0),
            Err(ShortenError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_default_window() {
        let window = WindowSpec::default();
        assert_eq!(window.start, 10_000);
        assert_eq!(window.length, 900);
    }

    #[test]
    fn test_end_saturates() {
        let window = WindowSpec::new(usize::MAX - 1, 10).unwrap();
        assert_eq!(window.end(), usize::MAX);
        assert_eq!(window.rows_available(100), 0);
    }

    #[test]
    fn test_extract_inside() {
        let table = numbered_table(100);
        let out = extract(&table, WindowSpec::new(20, 5).unwrap());

        assert_eq!(out.row_count(), 5);
        assert_eq!(out.index(), &[20, 21, 22, 23, 24]);
        assert_eq!(out.row(0), Some(vec!["20", "140", "20.25"]));
    }

    #[test]
    fn test_extract_truncates() {
        let table = numbered_table(100);
        let window = WindowSpec::new(90, 900).unwrap();
        let out = extract(&table, window);

        assert_eq!(out.row_count(), 10);
        assert_eq!(window.rows_available(100), 10);
        assert_eq!(out.index().first(), Some(&90));
        assert_eq!(out.index().last(), Some(&99));
    }

    #[test]
    fn test_extract_beyond_range() {
        let table = numbered_table(100);
        let out = extract(&table, WindowSpec::new(1000, 50).unwrap());

        assert!(out.is_empty());
        let names: Vec<&str> = out.column_names().collect();
        assert_eq!(names, vec!["frame", "head_direction.value", "speed"]);
    }

    #[test]
    fn test_extract_passes_cells_through() {
        let table = numbered_table(50);
        let out = extract(&table, WindowSpec::new(10, 10).unwrap());

        for (position, &label) in out.index().iter().enumerate() {
            assert_eq!(out.row(position), table.row(label));
        }
    }
}
