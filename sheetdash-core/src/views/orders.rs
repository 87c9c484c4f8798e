//! Purchase orders and investment

use super::{
    BreakdownRow, DashboardView, MetricValue, ViewFilter, ViewReport, distinct_count, group_rows,
    sort_descending, sum_by, sum_rows, whole_units,
};
use crate::datasets::Datasets;
use crate::schema::orders::*;

pub struct OrdersView;

impl DashboardView for OrdersView {
    fn id(&self) -> &'static str {
        "orders"
    }

    fn title(&self) -> &'static str {
        "Orders"
    }

    fn build(&self, data: &Datasets, filter: &ViewFilter) -> ViewReport {
        let book = &data.orders;
        if book.is_empty() {
            return ViewReport::no_data(self.id(), self.title(), "Pedidos");
        }

        let mut report = ViewReport::new(self.id(), self.title());

        // Headline figures always cover the whole order book.
        let confirmed_rows: Vec<usize> = (0..book.len())
            .filter(|&row| book.text(row, STATUS) == Some(STATUS_CONFIRMED))
            .collect();
        let total = book.len();
        let confirmed = confirmed_rows.len();

        report.metric("total_orders", "Total orders", MetricValue::Count(total));
        report.metric("pending", "Pending", MetricValue::Count(total - confirmed));
        report.metric("confirmed", "Confirmed", MetricValue::Count(confirmed));
        report.metric(
            "total_investment",
            "Total investment",
            MetricValue::Currency(book.sum(TOTAL_COST)),
        );
        report.metric(
            "confirmed_investment",
            "Confirmed investment",
            MetricValue::Currency(sum_rows(book, &confirmed_rows, TOTAL_COST)),
        );

        let filtered = filter.orders(book);
        let orders = &filtered;
        if orders.is_empty() {
            report.warn("No orders match the selected filters.");
            return report;
        }

        report.metric(
            "total_units",
            "Total units",
            MetricValue::Count(whole_units(orders.sum(QUANTITY))),
        );
        report.metric(
            "average_cost_per_order",
            "Average cost per order",
            MetricValue::Currency(orders.mean(TOTAL_COST).unwrap_or(0.0)),
        );
        report.metric(
            "suppliers",
            "Suppliers",
            MetricValue::Count(distinct_count(orders, SUPPLIER)),
        );

        if orders.has(TOTAL_COST) {
            let mut investment = sum_by(orders, PRODUCT, TOTAL_COST);
            sort_descending(&mut investment);
            report.breakdown("investment_by_product", "Investment by product", investment);
        }

        if orders.has(QUANTITY) {
            let units = group_rows(orders, PRODUCT)
                .into_iter()
                .map(|(product, rows)| {
                    let units = sum_rows(orders, &rows, QUANTITY);
                    BreakdownRow::new(product, MetricValue::Count(whole_units(units)))
                })
                .collect();
            report.breakdown("units_by_product", "Units by product", units);
        }

        let mut arrivals: Vec<(chrono::NaiveDate, String)> = (0..orders.len())
            .filter_map(|row| {
                let date = orders.date(row, ARRIVAL)?;
                let product = orders.text(row, PRODUCT).unwrap_or("N/A");
                let label = match orders.text(row, REFERENCE) {
                    Some(reference) => format!("{} / {}", reference, product),
                    None => product.to_string(),
                };
                Some((date, label))
            })
            .collect();
        arrivals.sort_by_key(|(date, _)| *date);
        report.breakdown(
            "arrival_timeline",
            "Estimated arrivals",
            arrivals
                .into_iter()
                .map(|(date, label)| {
                    BreakdownRow::new(label, MetricValue::Text(date.format("%Y-%m-%d").to_string()))
                })
                .collect(),
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::{approx, number, sample_datasets};

    #[test]
    fn test_order_counts_and_investment() {
        let report = OrdersView.build(&sample_datasets(), &ViewFilter::default());
        assert_eq!(report.get_metric("total_orders"), Some(&MetricValue::Count(3)));
        assert_eq!(report.get_metric("confirmed"), Some(&MetricValue::Count(2)));
        assert_eq!(report.get_metric("pending"), Some(&MetricValue::Count(1)));
        assert!(approx(number(&report, "total_investment"), 390.0));
        assert!(approx(number(&report, "confirmed_investment"), 140.0));
        assert!(approx(number(&report, "average_cost_per_order"), 130.0));
        assert_eq!(report.get_metric("total_units"), Some(&MetricValue::Count(19)));
        assert_eq!(report.get_metric("suppliers"), Some(&MetricValue::Count(2)));
    }

    #[test]
    fn test_order_breakdowns() {
        let report = OrdersView.build(&sample_datasets(), &ViewFilter::default());

        let investment = report.get_breakdown("investment_by_product").unwrap();
        assert_eq!(investment.labels(), vec!["Gadget", "Widget"]);
        assert_eq!(investment.value_of("Widget"), Some(&MetricValue::Currency(140.0)));

        let units = report.get_breakdown("units_by_product").unwrap();
        assert_eq!(units.labels(), vec!["Widget", "Gadget"]);
        assert_eq!(units.value_of("Widget"), Some(&MetricValue::Count(14)));

        // Sorted by date; the undated order is left out.
        let timeline = report.get_breakdown("arrival_timeline").unwrap();
        assert_eq!(timeline.labels(), vec!["P-2 / Gadget", "P-1 / Widget"]);
        assert_eq!(
            timeline.rows[0].value,
            MetricValue::Text("2024-03-01".into())
        );
    }

    #[test]
    fn test_orders_empty() {
        let report = OrdersView.build(&Datasets::default(), &ViewFilter::default());
        assert!(report.is_empty());
        assert_eq!(report.notices.len(), 1);
    }

    #[test]
    fn test_filtered_orders_keep_headline_totals() {
        let filter = ViewFilter::new()
            .with_status(crate::views::StatusFilter::Confirmed)
            .with_products(["Widget"]);
        let report = OrdersView.build(&sample_datasets(), &filter);

        assert_eq!(report.get_metric("total_orders"), Some(&MetricValue::Count(3)));
        assert!(approx(number(&report, "total_investment"), 390.0));

        assert_eq!(report.get_metric("total_units"), Some(&MetricValue::Count(14)));
        assert!(approx(number(&report, "average_cost_per_order"), 70.0));
        assert_eq!(report.get_metric("suppliers"), Some(&MetricValue::Count(1)));
        let investment = report.get_breakdown("investment_by_product").unwrap();
        assert_eq!(investment.labels(), vec!["Widget"]);
    }

    #[test]
    fn test_orders_filter_without_matches_warns() {
        let filter = ViewFilter::new()
            .with_status(crate::views::StatusFilter::Pending)
            .with_products(["Widget"]);
        let report = OrdersView.build(&sample_datasets(), &filter);
        assert_eq!(report.get_metric("pending"), Some(&MetricValue::Count(1)));
        assert!(report.get_metric("total_units").is_none());
        assert!(report.breakdowns.is_empty());
        assert_eq!(report.notices.count(crate::notice::Severity::Warning), 1);
    }

    #[test]
    fn test_fractional_units_are_truncated() {
        assert_eq!(whole_units(2.7), 2);
        assert_eq!(whole_units(-1.0), 0);
    }
}
