//! Supplier directory

use super::{
    BreakdownRow, DashboardView, MetricValue, ViewFilter, ViewReport, group_rows, sort_descending,
};
use crate::datasets::{Dataset, Datasets};
use crate::schema::{orders, suppliers};

const TOP_SUPPLIERS: usize = 5;

pub struct SuppliersView;

impl DashboardView for SuppliersView {
    fn id(&self) -> &'static str {
        "suppliers"
    }

    fn title(&self) -> &'static str {
        "Suppliers"
    }

    fn build(&self, data: &Datasets, filter: &ViewFilter) -> ViewReport {
        let directory = &data.suppliers;
        if directory.is_empty() {
            return ViewReport::no_data(self.id(), self.title(), "proveedores");
        }

        let mut report = ViewReport::new(self.id(), self.title());

        let with_phone = (0..directory.len())
            .filter(|&row| directory.text(row, suppliers::PHONE).is_some())
            .count();

        report.metric(
            "total_suppliers",
            "Total suppliers",
            MetricValue::Count(directory.len()),
        );
        report.metric("with_phone", "With phone", MetricValue::Count(with_phone));
        report.metric(
            "main_type",
            "Main type",
            MetricValue::Text(main_type(directory).unwrap_or_else(|| "N/A".to_string())),
        );

        let matching = filter.suppliers(directory);
        if matching.is_empty() {
            report.warn("No suppliers match the search.");
            return report;
        }

        report.breakdown(
            "suppliers_by_type",
            "Suppliers by type",
            count_by(&matching, suppliers::KIND),
        );

        let mut most_used = count_by(&data.orders, orders::SUPPLIER);
        sort_descending(&mut most_used);
        most_used.truncate(TOP_SUPPLIERS);
        report.breakdown("most_used", "Most used in orders", most_used);

        report
    }
}

/// Most frequent supplier type; ties go to the alphabetically first type.
fn main_type(directory: &Dataset) -> Option<String> {
    group_rows(directory, suppliers::KIND)
        .into_iter()
        .map(|(kind, rows)| (rows.len(), kind))
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
        .map(|(_, kind)| kind)
}

fn count_by(dataset: &Dataset, key: &str) -> Vec<BreakdownRow> {
    group_rows(dataset, key)
        .into_iter()
        .map(|(label, rows)| BreakdownRow::new(label, MetricValue::Count(rows.len())))
        .collect()
}
