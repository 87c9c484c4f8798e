//! Normalized tables built from raw worksheet grids

use crate::grid::cell_at;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

/// A typed, non-null cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// A nullable cell
pub type Cell = Option<Value>;

/// Inclusive, contiguous range of grid column indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnWindow {
    pub start: usize,
    pub end: usize,
}

impl ColumnWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn overlaps(&self, other: &ColumnWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Column names are unique and non-blank, no row is entirely null, and rows
/// keep their spreadsheet order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// A table is empty when it has no data rows, whatever its columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Case-insensitive partial lookup, see [`resolve_column`].
    pub fn resolve(&self, desired: &str) -> Option<&str> {
        resolve_column(&self.columns, desired)
    }

    /// Cell of `row` in column `name`; `None` for null or a missing column.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// All cells of one column, in row order
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&Value>> + '_> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(col).and_then(Option::as_ref)))
    }

    /// Keep only rows for which `keep` returns true, preserving order.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Replace every cell of column `name` through `convert`.
    pub fn map_column<F>(&mut self, name: &str, mut convert: F) -> bool
    where
        F: FnMut(Cell) -> Cell,
    {
        let Some(col) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            let cell = row[col].take();
            row[col] = convert(cell);
        }
        true
    }

    /// Append a column computed from each row. An existing name is suffixed.
    pub fn push_column<F>(&mut self, name: &str, mut derive: F) -> String
    where
        F: FnMut(&[Cell]) -> Cell,
    {
        let taken: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        let name = unique_name(name, &taken);
        for row in &mut self.rows {
            let cell = derive(row);
            row.push(cell);
        }
        self.columns.push(name.clone());
        name
    }

    /// Build a table from already-clean parts. Used by tests and exporters.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }
}

/// Find the first column whose name contains `desired`, ignoring case.
pub fn resolve_column<'a, S: AsRef<str>>(names: &'a [S], desired: &str) -> Option<&'a str> {
    let desired = desired.to_lowercase();
    names
        .iter()
        .map(|name| name.as_ref())
        .find(|name| name.to_lowercase().contains(&desired))
}

/// Normalize the rows below `header_row` into a [`NormalizedTable`].
///
/// With a `window`, only those grid columns are read; otherwise the header
/// row's full width is used. Short rows are padded with empty cells and
/// cells beyond the header width are ignored.
pub fn normalize(
    grid: &[Vec<String>],
    header_row: usize,
    window: Option<ColumnWindow>,
) -> NormalizedTable {
    let Some(header) = grid.get(header_row) else {
        return NormalizedTable::empty();
    };

    let indices: Vec<usize> = match window {
        Some(w) => w.indices().collect(),
        None => (0..header.len()).collect(),
    };

    // Blank-named columns are dropped before de-duplication.
    let kept: Vec<(usize, &str)> = indices
        .into_iter()
        .map(|i| (i, cell_at(header, i).trim()))
        .filter(|(_, name)| !name.is_empty())
        .collect();

    let columns = dedupe_names(kept.iter().map(|(_, name)| *name));

    let rows: Vec<Vec<Cell>> = grid
        .iter()
        .skip(header_row + 1)
        .map(|row| {
            kept.iter()
                .map(|(i, _)| {
                    let text = cell_at(row, *i);
                    if text.is_empty() {
                        None
                    } else {
                        Some(Value::Text(text.to_string()))
                    }
                })
                .collect::<Vec<Cell>>()
        })
        .filter(|row| row.iter().any(Option::is_some))
        .collect();

    debug!(
        header_row,
        columns = columns.len(),
        rows = rows.len(),
        "normalized grid"
    );

    NormalizedTable { columns, rows }
}

/// First occurrence keeps its name, later ones get `_1`, `_2`, ...
fn dedupe_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.collect();
    let mut taken: HashSet<String> = names.iter().map(|n| n.to_string()).collect();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        match seen.get_mut(name) {
            None => {
                seen.insert(name, 0);
                out.push(name.to_string());
            }
            Some(count) => {
                // Skip suffixes already used by a literal header such as "Name_1".
                let candidate = loop {
                    *count += 1;
                    let candidate = format!("{name}_{count}");
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                };
                taken.insert(candidate.clone());
                out.push(candidate);
            }
        }
    }

    out
}

fn unique_name(name: &str, taken: &HashSet<&str>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    (1..)
        .map(|n| format!("{name}_{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| name.to_string())
}
