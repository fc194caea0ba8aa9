//! Reading and writing `.htsv` files (tab-separated, one header line).

use crate::error::{Result, ShortenError};
use crate::table::types::Table;
use std::path::Path;
use tracing::debug;

/// Field separator.
pub const SEPARATOR: char = '\t';

/// Parse tab-separated text into a table.
///
/// The first non-empty line is the header. Empty lines are skipped and every
/// data row must have as many fields as the header.
pub fn parse_table(name: &str, text: &str) -> Result<Table> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines.next().ok_or_else(|| ShortenError::Malformed {
        table: name.to_string(),
        line: 1,
        reason: "no header line".to_string(),
    })?;

    let mut table = Table::with_header(name, header.split(SEPARATOR));
    let width = table.column_count();

    for (row, (line_no, line)) in lines.enumerate() {
        let cells: Vec<String> = line.split(SEPARATOR).map(str::to_string).collect();
        if cells.len() != width {
            return Err(ShortenError::Malformed {
                table: name.to_string(),
                line: line_no + 1,
                reason: format!("expected {width} fields, found {}", cells.len()),
            });
        }
        table.push_row(row, cells)?;
    }

    Ok(table)
}

/// Read a table from disk.
pub fn read_table(path: &Path, name: &str) -> Result<Table> {
    if !path.exists() {
        return Err(ShortenError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| ShortenError::io(path, e))?;
    let table = parse_table(name, &text)?;

    debug!(
        table = name,
        rows = table.row_count(),
        columns = table.column_count(),
        "read {}",
        path.display()
    );
    Ok(table)
}

/// Render a table as tab-separated text.
///
/// With `write_index`, a leading column with an empty header carries each
/// row's source position.
pub fn render_table(table: &Table, write_index: bool) -> String {
    let mut out = String::new();
    let sep = SEPARATOR.to_string();

    if write_index {
        out.push_str(&sep);
    }
    out.push_str(&table.column_names().collect::<Vec<_>>().join(sep.as_str()));
    out.push('\n');

    for (position, label) in table.index().iter().enumerate() {
        if write_index {
            out.push_str(&label.to_string());
            out.push(SEPARATOR);
        }
        let row = table.row(position).unwrap_or_default();
        out.push_str(&row.join(sep.as_str()));
        out.push('\n');
    }

    out
}

/// Write a table to `path`, replacing any existing file.
pub fn write_table(path: &Path, table: &Table, write_index: bool) -> Result<()> {
    std::fs::write(path, render_table(table, write_index)).map_err(|e| ShortenError::io(path, e))
}
