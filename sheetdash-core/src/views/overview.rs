//! Overview: sales against expenses

use super::{
    BreakdownRow, DashboardView, MetricValue, ViewFilter, ViewReport, group_rows, group_rows_by,
    sum_by, sum_rows, whole_units,
};
use crate::datasets::Datasets;
use crate::schema::{expenses, sales};

const TOP_PRODUCTS: usize = 3;

pub struct OverviewView;

impl DashboardView for OverviewView {
    fn id(&self) -> &'static str {
        "overview"
    }

    fn title(&self) -> &'static str {
        "General Summary"
    }

    fn build(&self, data: &Datasets, _filter: &ViewFilter) -> ViewReport {
        let sales = &data.sales;
        let expenses = &data.expenses;

        // Expenses alone are not a summary.
        if sales.is_empty() {
            return ViewReport::no_data(self.id(), self.title(), "Vendidos");
        }

        let mut report = ViewReport::new(self.id(), self.title());

        let total_sales = sales.sum(sales::REVENUE);
        let total_expenses = expenses.sum(expenses::AMOUNT);
        let units = sales.sum(sales::QUANTITY);
        let average_ticket = if units > 0.0 { total_sales / units } else { 0.0 };

        report.metric("total_sales", "Total sales", MetricValue::Currency(total_sales));
        report.metric(
            "total_expenses",
            "Total expenses",
            MetricValue::Currency(total_expenses),
        );
        report.metric(
            "net_profit",
            "Net profit",
            MetricValue::Currency(total_sales - total_expenses),
        );
        report.metric(
            "average_ticket",
            "Average ticket",
            MetricValue::Currency(average_ticket),
        );

        report.breakdown(
            "sales_by_month",
            "Sales by month",
            sum_by(sales, sales::MONTH, sales::REVENUE),
        );

        let expense_months = group_rows_by(expenses.len(), |row| {
            expenses
                .date(row, expenses::DATE)
                .map(|d| d.format("%Y-%m").to_string())
        });
        report.breakdown(
            "expenses_by_month",
            "Expenses by month",
            expense_months
                .into_iter()
                .map(|(month, rows)| {
                    BreakdownRow::new(
                        month,
                        MetricValue::Currency(sum_rows(expenses, &rows, expenses::AMOUNT)),
                    )
                })
                .collect(),
        );

        if sales.has(sales::QUANTITY) {
            let mut units: Vec<(String, f64)> = group_rows(sales, sales::PRODUCT)
                .into_iter()
                .map(|(product, rows)| {
                    let units = sum_rows(sales, &rows, sales::QUANTITY);
                    (product, units)
                })
                .collect();
            units.sort_by(|a, b| b.1.total_cmp(&a.1));
            units.truncate(TOP_PRODUCTS);
            let top = units
                .into_iter()
                .map(|(product, units)| {
                    BreakdownRow::new(product, MetricValue::Count(whole_units(units)))
                })
                .collect();
            report.breakdown("top_products", "Top 3 products by units", top);
        }

        report.breakdown(
            "expenses_by_category",
            "Expenses by category",
            sum_by(expenses, expenses::CATEGORY, expenses::AMOUNT),
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::{approx, number, sample_datasets};

    #[test]
    fn test_overview_metrics() {
        let report = OverviewView.build(&sample_datasets(), &ViewFilter::default());
        assert!(approx(number(&report, "total_sales"), 205.0));
        assert!(approx(number(&report, "total_expenses"), 55.0));
        assert!(approx(number(&report, "net_profit"), 150.0));
        assert!(approx(number(&report, "average_ticket"), 205.0 / 8.0));
        assert!(report.notices.is_empty());
    }

    #[test]
    fn test_overview_breakdowns() {
        let report = OverviewView.build(&sample_datasets(), &ViewFilter::default());

        let by_month = report.get_breakdown("sales_by_month").unwrap();
        assert_eq!(by_month.labels(), vec!["2024-01", "2024-02"]);
        assert_eq!(by_month.value_of("2024-02"), Some(&MetricValue::Currency(135.0)));

        // The undated expense is left out of the monthly series.
        let expense_months = report.get_breakdown("expenses_by_month").unwrap();
        assert_eq!(expense_months.value_of("2024-01"), Some(&MetricValue::Currency(15.0)));
        assert_eq!(expense_months.value_of("2024-02"), Some(&MetricValue::Currency(35.0)));

        let top = report.get_breakdown("top_products").unwrap();
        assert_eq!(top.labels(), vec!["Widget", "Gadget", "Gizmo"]);
        assert_eq!(top.rows[0].value, MetricValue::Count(5));

        let categories = report.get_breakdown("expenses_by_category").unwrap();
        assert_eq!(categories.labels(), vec!["Logística", "Insumos", "Marketing"]);
        assert_eq!(categories.value_of("Logística"), Some(&MetricValue::Currency(20.0)));
    }

    #[test]
    fn test_overview_without_units_has_zero_ticket() {
        let mut data = sample_datasets();
        let table = crate::table::NormalizedTable::from_parts(
            vec!["Producto".into(), "Ingreso Total (USD)".into()],
            vec![vec![
                Some(crate::table::Value::Text("Widget".into())),
                Some(crate::table::Value::Text("$20".into())),
            ]],
        );
        data.sales = crate::datasets::Dataset::build(
            sales::TABLE,
            table,
            sales::FIELDS,
            &Default::default(),
            &mut Default::default(),
        );
        let report = OverviewView.build(&data, &ViewFilter::default());
        assert!(approx(number(&report, "total_sales"), 20.0));
        assert_eq!(report.get_metric("average_ticket"), Some(&MetricValue::Currency(0.0)));
        assert!(report.get_breakdown("top_products").is_none());
        assert!(report.notices.is_empty());
    }

    #[test]
    fn test_expenses_without_sales_is_no_data() {
        let mut data = sample_datasets();
        data.sales = Default::default();
        let report = OverviewView.build(&data, &ViewFilter::default());
        assert!(report.is_empty());
        assert_eq!(report.notices.len(), 1);
    }

    #[test]
    fn test_top_products_truncate_fractional_units() {
        let mut data = sample_datasets();
        let cells = |product: &str, units: &str| {
            vec![
                Some(crate::table::Value::Text(product.into())),
                Some(crate::table::Value::Text(units.into())),
            ]
        };
        let table = crate::table::NormalizedTable::from_parts(
            vec!["Producto".into(), "Cantidad Vendida".into()],
            vec![cells("Widget", "1.5"), cells("Widget", "1.2"), cells("Gadget", "2")],
        );
        data.sales = crate::datasets::Dataset::build(
            sales::TABLE,
            table,
            sales::FIELDS,
            &Default::default(),
            &mut Default::default(),
        );
        let report = OverviewView.build(&data, &ViewFilter::default());
        let top = report.get_breakdown("top_products").unwrap();
        // 2.7 units rank first and show as 2.
        assert_eq!(top.labels(), vec!["Widget", "Gadget"]);
        assert_eq!(top.value_of("Widget"), Some(&MetricValue::Count(2)));
        assert_eq!(whole_units(2.999), 2);
    }

    #[test]
    fn test_overview_empty() {
        let report = OverviewView.build(&Datasets::default(), &ViewFilter::default());
        assert!(report.is_empty());
        assert_eq!(report.notices.len(), 1);
    }
}
