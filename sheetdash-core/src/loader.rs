//! Sheet loaders: fetch, locate the header, normalize, filter
//!
//! A missing worksheet or a failed fetch degrades to an empty table plus a
//! notice. A missing document is the one failure that ends the pass.

use crate::config::DashboardConfig;
use crate::error::{LoadError, SourceError};
use crate::grid::{RawGrid, find_header_row};
use crate::notice::{NoticeScope, Notices};
use crate::source::GridSource;
use crate::table::{Cell, NormalizedTable, Value, normalize};
use tracing::{error, info, warn};

/// Load a single-table sheet.
pub fn load_sheet(
    source: &dyn GridSource,
    sheet: &str,
    config: &DashboardConfig,
    notices: &mut Notices,
) -> Result<NormalizedTable, LoadError> {
    let Some(grid) = fetch(source, sheet, notices)? else {
        return Ok(NormalizedTable::empty());
    };
    if grid.is_empty() {
        return Ok(NormalizedTable::empty());
    }

    let header_row = find_header_row(&grid, config.marker_for(sheet));
    let table = normalize(&grid, header_row, None);

    info!(sheet, header_row, rows = table.len(), "loaded sheet");
    Ok(table)
}

/// Load the sheet holding two side-by-side tables.
///
/// Both blocks share one header row but are normalized separately, so a
/// column name appearing in both blocks is not a duplicate. The left block
/// drops its "Total" subtotal row; both drop rows with a blank first column.
pub fn load_dual_table(
    source: &dyn GridSource,
    sheet: &str,
    config: &DashboardConfig,
    notices: &mut Notices,
) -> Result<(NormalizedTable, NormalizedTable), LoadError> {
    let Some(grid) = fetch(source, sheet, notices)? else {
        return Ok((NormalizedTable::empty(), NormalizedTable::empty()));
    };
    if grid.is_empty() {
        return Ok((NormalizedTable::empty(), NormalizedTable::empty()));
    }

    let layout = &config.dual_table;
    let header_row = find_header_row(&grid, &layout.marker);

    let mut left = normalize(&grid, header_row, Some(layout.left));
    left.retain_rows(|row| first_cell_text(row).is_some_and(|text| !is_total_label(text)));

    let mut right = normalize(&grid, header_row, Some(layout.right));
    right.retain_rows(|row| first_cell_text(row).is_some());

    info!(
        sheet,
        header_row,
        left_rows = left.len(),
        right_rows = right.len(),
        "loaded dual-table sheet"
    );
    Ok((left, right))
}

/// Fetch a grid, turning recoverable failures into notices.
fn fetch(
    source: &dyn GridSource,
    sheet: &str,
    notices: &mut Notices,
) -> Result<Option<RawGrid>, LoadError> {
    match source.fetch_grid(sheet) {
        Ok(grid) => Ok(Some(grid)),
        Err(SourceError::SheetNotFound { sheet: missing }) => {
            warn!(sheet = %missing, "worksheet not found");
            notices.warn(
                NoticeScope::Sheet(sheet.to_string()),
                format!("Worksheet '{}' not found in the spreadsheet.", missing),
            );
            Ok(None)
        }
        Err(SourceError::DocumentNotFound { document }) => {
            error!(%document, "spreadsheet not found");
            Err(LoadError::DocumentNotFound { document })
        }
        Err(e @ SourceError::Transport { .. }) => {
            warn!(sheet, error = %e, "worksheet fetch failed");
            notices.error(
                NoticeScope::Sheet(sheet.to_string()),
                format!("Error loading worksheet '{}': {}", sheet, e),
            );
            Ok(None)
        }
    }
}

/// Trimmed text of the first cell, `None` when null or blank.
fn first_cell_text(row: &[Cell]) -> Option<&str> {
    row.first()?
        .as_ref()
        .and_then(Value::as_text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn is_total_label(text: &str) -> bool {
    text.trim().to_lowercase() == "total"
}
