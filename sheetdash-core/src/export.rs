//! CSV export of normalized tables

use crate::datasets::Datasets;
use crate::table::NormalizedTable;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `table` as CSV: a header of column names, then one record per row.
/// Null cells become empty fields and dates are written as `YYYY-MM-DD`.
pub fn write_csv<W: Write>(table: &NormalizedTable, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.columns())?;
    for row in table.rows() {
        csv.write_record(
            row.iter()
                .map(|cell| cell.as_ref().map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }
    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(table: &NormalizedTable) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

pub fn write_csv_file<P: AsRef<Path>>(table: &NormalizedTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(table, file).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write one `<dataset>.csv` per dataset into `dir`, creating it if needed.
pub fn export_datasets<P: AsRef<Path>>(datasets: &Datasets, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for dataset in datasets.all() {
        let path = dir.join(format!("{}.csv", dataset.name));
        write_csv_file(&dataset.table, &path)?;
        info!(path = %path.display(), rows = dataset.len(), "exported dataset");
        written.push(path);
    }
    Ok(written)
}
