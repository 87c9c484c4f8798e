//! Lenient cell value parsers
//!
//! Spreadsheet cells are typed by hand, so every parser here resolves
//! malformed input to a default (`0.0` for numbers, `None` for dates)
//! instead of returning an error. The `try_*` variants expose the strict
//! outcome so callers can count silent fallbacks in [`ParseDiagnostics`].

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Month-name lookup used by [`parse_localized_date`]. Keys are upper-case.
pub type MonthTable = HashMap<String, u32>;

/// Magnitude above which a percentage is read as percent points.
pub const PERCENT_POINTS_THRESHOLD: f64 = 5.0;

/// Day-first layouts tried by the generic date parser, in order. Two-digit
/// years go first because `%Y` would also accept `24` as year 24.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d-%m-%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d",
];

/// Parse a currency cell such as `"$1,234.56"`. Blank or unparsable input yields `0.0`.
pub fn parse_monetary(raw: Option<&str>) -> f64 {
    raw.and_then(try_parse_monetary).unwrap_or(0.0)
}

/// Strict form of [`parse_monetary`]: `None` when the text is not a number.
pub fn try_parse_monetary(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ' ' | ','))
        .collect();
    parse_finite(&cleaned)
}

/// Parse a percentage cell into a fraction.
///
/// Values whose magnitude exceeds [`PERCENT_POINTS_THRESHOLD`] are taken to be
/// percent points and divided by 100, so `"22.42%"` and `"22.42"` both give
/// `0.2242` while `"0.35"` stays `0.35`. A genuine ratio above 5 (ROI over
/// 500%) is misread by this rule.
pub fn parse_percent(raw: Option<&str>) -> f64 {
    raw.and_then(try_parse_percent).unwrap_or(0.0)
}

/// Strict form of [`parse_percent`].
pub fn try_parse_percent(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('%', "");
    let value = parse_finite(cleaned.trim())?;
    if value.abs() > PERCENT_POINTS_THRESHOLD {
        Some(value / 100.0)
    } else {
        Some(value)
    }
}

/// Parse either `"MONTH YEAR"` (via `months`, day 1) or a day-first calendar date.
pub fn parse_localized_date(raw: Option<&str>, months: &MonthTable) -> Option<NaiveDate> {
    let raw = raw?;
    let upper = raw.trim().to_uppercase();
    let tokens: Vec<&str> = upper.split_whitespace().collect();

    if let [month_name, year] = tokens.as_slice() {
        if let Some(&month) = months.get(*month_name) {
            let year: i32 = year.parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }

    parse_day_first(&upper)
}

/// Generic day-first parse. A trailing time component is ignored.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    let date_part = text.split_whitespace().next().unwrap_or(text);

    DAY_FIRST_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The Spanish month table the source spreadsheet is written in.
pub fn spanish_months() -> MonthTable {
    [
        ("ENERO", 1),
        ("FEBRERO", 2),
        ("MARZO", 3),
        ("ABRIL", 4),
        ("MAYO", 5),
        ("JUNIO", 6),
        ("JULIO", 7),
        ("AGOSTO", 8),
        ("SEPTIEMBRE", 9),
        ("SETIEMBRE", 9),
        ("OCTUBRE", 10),
        ("NOVIEMBRE", 11),
        ("DICIEMBRE", 12),
    ]
    .into_iter()
    .map(|(name, month)| (name.to_string(), month))
    .collect()
}

/// Counts of non-blank cells that fell back to a lenient default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// Failures keyed by `"table/column"`
    failures: BTreeMap<String, usize>,
}

impl ParseDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failed cell
    pub fn record(&mut self, table: &str, column: &str) {
        *self.failures.entry(format!("{table}/{column}")).or_insert(0) += 1;
    }

    /// Failures for one column of one table
    pub fn failures_for(&self, table: &str, column: &str) -> usize {
        self.failures
            .get(&format!("{table}/{column}"))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.failures.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.failures.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
