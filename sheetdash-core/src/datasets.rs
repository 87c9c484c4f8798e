//! Typed datasets built from the normalized sheets
//!
//! Columns are found through the nominal schemas and converted with the
//! lenient value parsers. A column that cannot be found stays untyped and
//! every accessor for it yields `None`.

use crate::config::DashboardConfig;
use crate::parse::{
    MonthTable, ParseDiagnostics, parse_localized_date, try_parse_monetary, try_parse_percent,
};
use crate::schema::{self, FieldKind, FieldSpec};
use crate::table::{Cell, NormalizedTable, Value, resolve_column};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// One typed table plus the real names of its semantic columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub name: &'static str,
    pub table: NormalizedTable,
    columns: HashMap<&'static str, String>,
}

impl Dataset {
    /// Resolve `fields` against `table` and type the matching columns.
    pub fn build(
        name: &'static str,
        mut table: NormalizedTable,
        fields: &[FieldSpec],
        months: &MonthTable,
        diagnostics: &mut ParseDiagnostics,
    ) -> Self {
        let mut columns = HashMap::new();

        for spec in fields {
            let Some(actual) = resolve_field(&table, spec) else {
                debug!(dataset = name, field = spec.key, nominal = spec.nominal, "column not found");
                continue;
            };
            convert_column(&mut table, name, &actual, spec.kind, months, diagnostics);
            columns.insert(spec.key, actual);
        }

        Self {
            name,
            table,
            columns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Real column name for a field key
    pub fn column(&self, key: &str) -> Option<&str> {
        self.columns.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    pub fn value(&self, row: usize, key: &str) -> Option<&Value> {
        self.table.get(row, self.column(key)?)
    }

    /// Trimmed, non-blank text
    pub fn text(&self, row: usize, key: &str) -> Option<&str> {
        self.value(row, key)
            .and_then(Value::as_text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn number(&self, row: usize, key: &str) -> Option<f64> {
        self.value(row, key).and_then(Value::as_number)
    }

    pub fn date(&self, row: usize, key: &str) -> Option<NaiveDate> {
        self.value(row, key).and_then(Value::as_date)
    }

    /// Sum of a numeric field, `0.0` when the field is missing
    pub fn sum(&self, key: &str) -> f64 {
        (0..self.len()).filter_map(|row| self.number(row, key)).sum()
    }

    /// Mean of a numeric field over all rows, `None` when missing or empty
    pub fn mean(&self, key: &str) -> Option<f64> {
        if !self.has(key) || self.is_empty() {
            return None;
        }
        let values: Vec<f64> = (0..self.len()).filter_map(|row| self.number(row, key)).collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Copy holding only the rows for which `keep` is true
    pub fn filtered<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(usize) -> bool,
    {
        let rows = self
            .table
            .rows()
            .iter()
            .enumerate()
            .filter(|(row, _)| keep(*row))
            .map(|(_, cells)| cells.clone())
            .collect();
        Dataset {
            name: self.name,
            table: NormalizedTable::from_parts(self.table.columns().to_vec(), rows),
            columns: self.columns.clone(),
        }
    }

    /// All cells of a row rendered and joined with spaces
    pub fn row_text(&self, row: usize) -> String {
        self.table
            .rows()
            .get(row)
            .map(|cells| {
                cells
                    .iter()
                    .flatten()
                    .map(|value| value.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    /// Keep rows whose `key` text is present
    fn retain_with_text(&mut self, key: &str) {
        let Some(col) = self.column(key).and_then(|c| self.table.column_index(c)) else {
            return;
        };
        self.table.retain_rows(|row| {
            row[col]
                .as_ref()
                .and_then(Value::as_text)
                .is_some_and(|s| !s.trim().is_empty())
        });
    }

    fn derive_column<F>(&mut self, key: &'static str, name: &str, derive: F)
    where
        F: FnMut(&[Cell]) -> Cell,
    {
        let actual = self.table.push_column(name, derive);
        self.columns.insert(key, actual);
    }
}

/// The five typed datasets of one rendering pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub sales: Dataset,
    pub expenses: Dataset,
    pub profitability: Dataset,
    pub orders: Dataset,
    pub suppliers: Dataset,
}

/// Normalized tables as they come out of the loaders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedTables {
    pub sales: NormalizedTable,
    pub expenses: NormalizedTable,
    pub profitability: NormalizedTable,
    pub orders: NormalizedTable,
    pub suppliers: NormalizedTable,
}

impl Datasets {
    pub fn build(
        loaded: LoadedTables,
        config: &DashboardConfig,
        diagnostics: &mut ParseDiagnostics,
    ) -> Self {
        let months = config.month_table();
        Self {
            sales: build_sales(loaded.sales, &months, diagnostics),
            expenses: Dataset::build(
                schema::expenses::TABLE,
                loaded.expenses,
                schema::expenses::FIELDS,
                &months,
                diagnostics,
            ),
            profitability: build_profitability(loaded.profitability, &months, diagnostics),
            orders: build_orders(loaded.orders, &months, diagnostics),
            suppliers: Dataset::build(
                schema::suppliers::TABLE,
                loaded.suppliers,
                schema::suppliers::FIELDS,
                &months,
                diagnostics,
            ),
        }
    }

    /// All datasets in sheet order
    pub fn all(&self) -> [&Dataset; 5] {
        [
            &self.sales,
            &self.expenses,
            &self.profitability,
            &self.orders,
            &self.suppliers,
        ]
    }
}

fn build_sales(
    table: NormalizedTable,
    months: &MonthTable,
    diagnostics: &mut ParseDiagnostics,
) -> Dataset {
    use schema::sales::*;

    let mut dataset = Dataset::build(TABLE, table, FIELDS, months, diagnostics);
    if let Some(date_col) = dataset.column(DATE).and_then(|c| dataset.table.column_index(c)) {
        dataset.derive_column(MONTH, MONTH_COLUMN, |row| {
            row[date_col]
                .as_ref()
                .and_then(Value::as_date)
                .map(|d| Value::Text(d.format("%Y-%m").to_string()))
        });
    }
    dataset
}

fn build_profitability(
    table: NormalizedTable,
    months: &MonthTable,
    diagnostics: &mut ParseDiagnostics,
) -> Dataset {
    use schema::profitability::*;

    let mut dataset = Dataset::build(TABLE, table, FIELDS, months, diagnostics);
    dataset.retain_with_text(PRODUCT);
    dataset
}

fn build_orders(
    table: NormalizedTable,
    months: &MonthTable,
    diagnostics: &mut ParseDiagnostics,
) -> Dataset {
    use schema::orders::*;

    let mut dataset = Dataset::build(TABLE, table, FIELDS, months, diagnostics);
    dataset.retain_with_text(PRODUCT);

    let confirmed_col = dataset
        .column(CONFIRMED)
        .and_then(|c| dataset.table.column_index(c));
    dataset.derive_column(STATUS, STATUS_COLUMN, |row| {
        let confirmed = confirmed_col
            .and_then(|col| row[col].as_ref())
            .and_then(Value::as_text)
            .is_some_and(is_confirmed_value);
        let status = if confirmed {
            STATUS_CONFIRMED
        } else {
            STATUS_PENDING
        };
        Some(Value::Text(status.to_string()))
    });
    dataset
}

/// Whether an order's confirmation cell reads as "yes"
pub fn is_confirmed_value(text: &str) -> bool {
    let upper = text.trim().to_uppercase();
    schema::orders::CONFIRMED_VALUES.contains(&upper.as_str())
}

fn resolve_field(table: &NormalizedTable, spec: &FieldSpec) -> Option<String> {
    if spec.exact {
        table
            .has_column(spec.nominal)
            .then(|| spec.nominal.to_string())
    } else {
        resolve_column(table.columns(), spec.pattern).map(str::to_string)
    }
}

fn convert_column(
    table: &mut NormalizedTable,
    dataset: &str,
    column: &str,
    kind: FieldKind,
    months: &MonthTable,
    diagnostics: &mut ParseDiagnostics,
) {
    if kind == FieldKind::Text {
        return;
    }

    let mut failures = 0usize;
    table.map_column(column, |cell| {
        let text = cell.as_ref().and_then(Value::as_text);
        match kind {
            FieldKind::Monetary | FieldKind::Percent => {
                let strict = match kind {
                    FieldKind::Monetary => text.map(try_parse_monetary),
                    _ => text.map(try_parse_percent),
                };
                // Blank cells read as zero without counting as a failure.
                let value = match strict {
                    Some(Some(v)) => v,
                    Some(None) => {
                        failures += 1;
                        0.0
                    }
                    None => 0.0,
                };
                Some(Value::Number(value))
            }
            FieldKind::Date => {
                let date = parse_localized_date(text, months);
                if text.is_some() && date.is_none() {
                    failures += 1;
                }
                date.map(Value::Date)
            }
            FieldKind::Text => cell,
        }
    });

    for _ in 0..failures {
        diagnostics.record(dataset, column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::test_grid as grid;
    use crate::table::normalize;
    use schema::{orders, profitability, sales};

    fn table(rows: &[&[&str]]) -> NormalizedTable {
        normalize(&grid(rows), 0, None)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sales_typing_and_month() {
        let mut diagnostics = ParseDiagnostics::new();
        let loaded = LoadedTables {
            sales: table(&[
                &[
                    "Producto",
                    "Categoría",
                    "Fecha de Venta",
                    "Cantidad Vendida",
                    "Precio Unitario (USD)",
                    "Ingreso Total (USD)",
                    "Método de Pago",
                ],
                &["Widget", "A", "15/01/2024", "2", "$10.00", "$20.00", "Zelle"],
                &["Gadget", "B", "Marzo 2024", "1", "$5", "oops", "Cash"],
                &["Gizmo", "B", "", "", "", "", ""],
            ]),
            ..LoadedTables::default()
        };
        let data = Datasets::build(loaded, &DashboardConfig::default(), &mut diagnostics);
        let s = &data.sales;

        assert_eq!(s.column(sales::UNIT_PRICE), Some("Precio Unitario (USD)"));
        assert_eq!(s.column(sales::PAYMENT_METHOD), Some("Método de Pago"));
        assert!(approx(s.sum(sales::REVENUE), 20.0));
        assert!(approx(s.sum(sales::QUANTITY), 3.0));
        assert_eq!(s.number(2, sales::REVENUE), Some(0.0));
        assert_eq!(s.date(0, sales::DATE), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(s.text(0, sales::MONTH), Some("2024-01"));
        assert_eq!(s.text(1, sales::MONTH), Some("2024-03"));
        assert_eq!(s.text(2, sales::MONTH), None);

        // Only the non-blank "oops" revenue counts as a parse failure.
        assert_eq!(diagnostics.total(), 1);
        assert_eq!(diagnostics.failures_for("ventas", "Ingreso Total (USD)"), 1);
    }

    #[test]
    fn test_missing_columns_stay_untyped() {
        let mut diagnostics = ParseDiagnostics::new();
        let loaded = LoadedTables {
            sales: table(&[&["Producto", "Notas"], &["Widget", "x"]]),
            ..LoadedTables::default()
        };
        let data = Datasets::build(loaded, &DashboardConfig::default(), &mut diagnostics);
        assert!(!data.sales.has(sales::REVENUE));
        assert!(!data.sales.has(sales::MONTH));
        assert_eq!(data.sales.sum(sales::REVENUE), 0.0);
        assert_eq!(data.sales.mean(sales::REVENUE), None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_profitability_percentages_and_blank_products() {
        let mut diagnostics = ParseDiagnostics::new();
        let loaded = LoadedTables {
            profitability: table(&[
                &["Producto", "Método de venta", "Costo Total", "MARGIN", "ROI"],
                &["Widget", "Amazon", "$10", "22.42%", "0.35"],
                &[" ", "Amazon", "$3", "10%", "5.5"],
                &["Gadget", "Tienda", "$1,000.50", "", "abc"],
            ]),
            ..LoadedTables::default()
        };
        let data = Datasets::build(loaded, &DashboardConfig::default(), &mut diagnostics);
        let p = &data.profitability;

        assert_eq!(p.len(), 2);
        assert!(approx(p.number(0, profitability::MARGIN).unwrap(), 0.2242));
        assert!(approx(p.number(0, profitability::ROI).unwrap(), 0.35));
        assert!(approx(p.number(1, profitability::TOTAL_COST).unwrap(), 1000.5));
        assert_eq!(p.number(1, profitability::MARGIN), Some(0.0));
        assert_eq!(diagnostics.failures_for("rentabilidad", "ROI"), 1);
    }

    #[test]
    fn test_orders_status_and_filter() {
        let mut diagnostics = ParseDiagnostics::new();
        let loaded = LoadedTables {
            orders: table(&[
                &[
                    "Referencia del Pedido",
                    "Producto",
                    "Proveedor",
                    "Costo Total Estimado (USD)",
                    "Fecha Estimada de Llegada",
                    "¿Pedido Confirmado?",
                ],
                &["P-1", "Widget", "Acme", "$100", "01/02/2024", "Sí"],
                &["P-2", "", "Acme", "$50", "", "SI"],
                &["P-3", "Gadget", "Beta", "$30", "pronto", "no"],
            ]),
            ..LoadedTables::default()
        };
        let data = Datasets::build(loaded, &DashboardConfig::default(), &mut diagnostics);
        let o = &data.orders;

        assert_eq!(o.len(), 2);
        assert_eq!(o.text(0, orders::STATUS), Some(orders::STATUS_CONFIRMED));
        assert_eq!(o.text(1, orders::STATUS), Some(orders::STATUS_PENDING));
        assert_eq!(o.date(1, orders::ARRIVAL), None);
        assert_eq!(diagnostics.failures_for("pedidos", "Fecha Estimada de Llegada"), 1);
    }

    #[test]
    fn test_orders_without_confirmation_column_are_pending() {
        let mut diagnostics = ParseDiagnostics::new();
        let loaded = LoadedTables {
            orders: table(&[&["Producto"], &["Widget"]]),
            ..LoadedTables::default()
        };
        let data = Datasets::build(loaded, &DashboardConfig::default(), &mut diagnostics);
        assert_eq!(data.orders.text(0, orders::STATUS), Some(orders::STATUS_PENDING));
    }

    #[test]
    fn test_confirmed_values() {
        for yes in ["si", "Sí", " YES ", "true", "Verdadero", "1"] {
            assert!(is_confirmed_value(yes), "{yes}");
        }
        for no in ["no", "", "pendiente", "0"] {
            assert!(!is_confirmed_value(no), "{no}");
        }
    }
}
