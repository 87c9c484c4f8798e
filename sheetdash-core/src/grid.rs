//! Raw worksheet grids and header-row detection

use tracing::debug;

/// All cell values of one worksheet, row-major. Rows may be ragged.
pub type RawGrid = Vec<Vec<String>>;

/// Find the first row with a cell containing `marker` (case-insensitive).
///
/// Falls back to row 0 when no cell matches, since well-formed sheets keep
/// their header on the first row.
pub fn find_header_row(grid: &[Vec<String>], marker: &str) -> usize {
    let marker = marker.to_lowercase();

    let found = grid.iter().position(|row| {
        row.iter()
            .any(|cell| cell.to_lowercase().contains(&marker))
    });

    match found {
        Some(index) => {
            debug!(row = index, %marker, "header row located");
            index
        }
        None => {
            debug!(%marker, "no header marker found, using first row");
            0
        }
    }
}

/// Cell at `(row, col)` or `""` when the row is shorter.
pub fn cell_at(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
pub(crate) fn test_grid(rows: &[&[&str]]) -> RawGrid {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}
