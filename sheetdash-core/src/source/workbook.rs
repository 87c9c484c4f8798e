//! Local workbook source using calamine
//!
//! Reads an `.xlsx`/`.xls`/`.ods` export of the spreadsheet. The workbook is
//! reopened on every fetch so edits to the file show up on the next pass.

use super::GridSource;
use crate::error::SourceError;
use crate::grid::RawGrid;
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A spreadsheet file on disk
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
    document: String,
}

impl WorkbookSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let document = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, document }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GridSource for WorkbookSource {
    fn document(&self) -> &str {
        &self.document
    }

    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, SourceError> {
        if !self.path.is_file() {
            return Err(SourceError::DocumentNotFound {
                document: self.path.display().to_string(),
            });
        }
        File::open(&self.path).map_err(|e| open_error(&self.path, sheet, &e))?;

        let mut workbook =
            open_workbook_auto(&self.path).map_err(|e| SourceError::Transport {
                sheet: sheet.to_string(),
                message: format!("failed to open {}: {}", self.path.display(), e),
            })?;

        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(SourceError::SheetNotFound {
                sheet: sheet.to_string(),
            });
        }

        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| SourceError::Transport {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })?;

        let grid = range_to_grid(&range);
        debug!(sheet, rows = grid.len(), "read worksheet from workbook");
        Ok(grid)
    }
}

/// A file we may not read is as good as missing; other I/O failures are transient.
fn open_error(path: &Path, sheet: &str, err: &io::Error) -> SourceError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => SourceError::DocumentNotFound {
            document: path.display().to_string(),
        },
        _ => SourceError::Transport {
            sheet: sheet.to_string(),
            message: format!("failed to open {}: {}", path.display(), err),
        },
    }
}

/// Convert a calamine range to a grid anchored at A1.
///
/// calamine ranges start at the first used cell, so leading blank rows and
/// columns are restored to keep column indices stable.
fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
    let mut grid: RawGrid = vec![Vec::new(); row_offset as usize];

    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset as usize];
        cells.extend(row.iter().map(cell_text));
        grid.push(cells);
    }

    grid
}

/// Render a cell the way the spreadsheet UI displays it
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.format("%d/%m/%Y").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::Error(e) => e.to_string(),
    }
}
