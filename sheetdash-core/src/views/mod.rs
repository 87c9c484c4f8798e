//! Dashboard views
//!
//! Each view turns the typed datasets into a [`ViewReport`]: headline
//! metrics plus labelled breakdowns. Views never fail; missing data shows
//! up as an informational notice on the report.

pub mod channels;
pub mod costs;
pub mod filter;
pub mod orders;
pub mod overview;
pub mod profitability;
pub mod registry;
pub mod suppliers;

use crate::datasets::{Dataset, Datasets};
use crate::notice::{NoticeScope, Notices};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub use filter::{StatusFilter, ViewFilter};

/// Trait that all dashboard views must implement
pub trait DashboardView: Send + Sync {
    /// Stable identifier, e.g. "overview"
    fn id(&self) -> &'static str;

    /// Human-readable title
    fn title(&self) -> &'static str;

    /// Compute the view from the current datasets. Views without
    /// selections ignore `filter`.
    fn build(&self, data: &Datasets, filter: &ViewFilter) -> ViewReport;
}

/// A metric value together with how it should be read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MetricValue {
    Currency(f64),
    /// A fraction, `0.35` is 35%
    Percent(f64),
    Count(usize),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Currency(v) | MetricValue::Percent(v) => Some(*v),
            MetricValue::Count(n) => Some(*n as f64),
            MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Currency(v) => write!(f, "${}", group_thousands(*v)),
            MetricValue::Percent(v) => write!(f, "{:.1}%", v * 100.0),
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// `1234567.891` -> `"1,234,567.89"`
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// A headline number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub key: &'static str,
    pub label: String,
    pub value: MetricValue,
}

/// One labelled row of a breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub label: String,
    pub value: MetricValue,
}

impl BreakdownRow {
    pub fn new(label: impl Into<String>, value: MetricValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A named series of label/value rows, e.g. sales by month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub key: &'static str,
    pub title: String,
    pub rows: Vec<BreakdownRow>,
}

impl Breakdown {
    /// Value of the row labelled `label`
    pub fn value_of(&self, label: &str) -> Option<&MetricValue> {
        self.rows.iter().find(|r| r.label == label).map(|r| &r.value)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }
}

/// The computed content of one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewReport {
    pub id: &'static str,
    pub title: &'static str,
    pub metrics: Vec<Metric>,
    pub breakdowns: Vec<Breakdown>,
    pub notices: Notices,
}

impl ViewReport {
    pub fn new(id: &'static str, title: &'static str) -> Self {
        Self {
            id,
            title,
            metrics: Vec::new(),
            breakdowns: Vec::new(),
            notices: Notices::new(),
        }
    }

    /// A report with no content and an informational notice
    pub fn no_data(id: &'static str, title: &'static str, sheet: &str) -> Self {
        let mut report = Self::new(id, title);
        report.notices.info(
            NoticeScope::View(id.to_string()),
            format!("No data available in sheet '{}'.", sheet),
        );
        report
    }

    pub fn metric(&mut self, key: &'static str, label: impl Into<String>, value: MetricValue) {
        self.metrics.push(Metric {
            key,
            label: label.into(),
            value,
        });
    }

    /// Add a breakdown; empty ones are skipped
    pub fn breakdown(&mut self, key: &'static str, title: impl Into<String>, rows: Vec<BreakdownRow>) {
        if rows.is_empty() {
            return;
        }
        self.breakdowns.push(Breakdown {
            key,
            title: title.into(),
            rows,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notices.info(NoticeScope::View(self.id.to_string()), message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.notices.warn(NoticeScope::View(self.id.to_string()), message);
    }

    pub fn get_metric(&self, key: &str) -> Option<&MetricValue> {
        self.metrics.iter().find(|m| m.key == key).map(|m| &m.value)
    }

    pub fn get_breakdown(&self, key: &str) -> Option<&Breakdown> {
        self.breakdowns.iter().find(|b| b.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.breakdowns.is_empty()
    }
}

/// Row indices grouped by a label, in order of first appearance.
/// Rows without a label are left out.
pub(crate) fn group_rows_by<F>(len: usize, mut label: F) -> Vec<(String, Vec<usize>)>
where
    F: FnMut(usize) -> Option<String>,
{
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in 0..len {
        let Some(key) = label(row) else {
            continue;
        };
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(row),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }
    groups
}

/// Group by the text of a dataset field
pub(crate) fn group_rows(dataset: &Dataset, key: &str) -> Vec<(String, Vec<usize>)> {
    group_rows_by(dataset.len(), |row| dataset.text(row, key).map(str::to_string))
}

pub(crate) fn sum_rows(dataset: &Dataset, rows: &[usize], key: &str) -> f64 {
    rows.iter().filter_map(|&row| dataset.number(row, key)).sum()
}

/// Mean over rows holding a number, `0.0` when none do
pub(crate) fn mean_rows(dataset: &Dataset, rows: &[usize], key: &str) -> f64 {
    let values: Vec<f64> = rows.iter().filter_map(|&row| dataset.number(row, key)).collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Per-group sums of `value_key`, as currency rows
pub(crate) fn sum_by(dataset: &Dataset, label_key: &str, value_key: &str) -> Vec<BreakdownRow> {
    group_rows(dataset, label_key)
        .into_iter()
        .map(|(label, rows)| {
            BreakdownRow::new(label, MetricValue::Currency(sum_rows(dataset, &rows, value_key)))
        })
        .collect()
}

/// Number of distinct non-blank values of a text field
pub(crate) fn distinct_count(dataset: &Dataset, key: &str) -> usize {
    group_rows(dataset, key).len()
}

/// Unit counts are shown as whole units, dropping any fraction
pub(crate) fn whole_units(units: f64) -> usize {
    units.trunc().max(0.0) as usize
}

/// Stable sort, largest value first
pub(crate) fn sort_descending(rows: &mut [BreakdownRow]) {
    rows.sort_by(|a, b| {
        let a = a.value.as_f64().unwrap_or(0.0);
        let b = b.value.as_f64().unwrap_or(0.0);
        b.total_cmp(&a)
    });
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_display() {
        assert_eq!(MetricValue::Currency(1234567.891).to_string(), "$1,234,567.89");
        assert_eq!(MetricValue::Currency(0.0).to_string(), "$0.00");
        assert_eq!(MetricValue::Currency(-950.5).to_string(), "$-950.50");
        assert_eq!(MetricValue::Currency(999.999).to_string(), "$1,000.00");
        assert_eq!(MetricValue::Percent(0.35).to_string(), "35.0%");
        assert_eq!(MetricValue::Percent(0.2242).to_string(), "22.4%");
        assert_eq!(MetricValue::Count(7).to_string(), "7");
        assert_eq!(MetricValue::Text("Amazon".into()).to_string(), "Amazon");
    }

    #[test]
    fn test_group_rows_by_first_appearance() {
        let labels = [Some("b"), Some("a"), None, Some("b"), Some("c")];
        let groups = group_rows_by(labels.len(), |row| labels[row].map(str::to_string));
        assert_eq!(
            groups,
            vec![
                ("b".to_string(), vec![0, 3]),
                ("a".to_string(), vec![1]),
                ("c".to_string(), vec![4]),
            ]
        );
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let mut rows = vec![
            BreakdownRow::new("x", MetricValue::Count(1)),
            BreakdownRow::new("y", MetricValue::Count(3)),
            BreakdownRow::new("z", MetricValue::Count(1)),
        ];
        sort_descending(&mut rows);
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["y", "x", "z"]);
    }

    #[test]
    fn test_empty_breakdown_skipped() {
        let mut report = ViewReport::new("overview", "Overview");
        report.breakdown("sales_by_month", "Sales by month", Vec::new());
        assert!(report.breakdowns.is_empty());
        assert!(report.is_empty());
    }
}
