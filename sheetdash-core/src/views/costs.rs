//! Cost structure of the product catalogue

use super::channels::{ChannelSummary, summarize_channels};
use super::{
    BreakdownRow, DashboardView, MetricValue, ViewFilter, ViewReport, distinct_count,
    sort_descending, sum_by,
};
use crate::datasets::{Dataset, Datasets};
use crate::schema::profitability::*;

pub struct CostsView;

impl DashboardView for CostsView {
    fn id(&self) -> &'static str {
        "costs"
    }

    fn title(&self) -> &'static str {
        "Cost Analysis"
    }

    fn build(&self, data: &Datasets, filter: &ViewFilter) -> ViewReport {
        if data.profitability.is_empty() {
            return ViewReport::no_data(self.id(), self.title(), "Modelo Unitario de Rentabilidad");
        }

        let mut report = ViewReport::new(self.id(), self.title());
        let filtered = filter.profitability(&data.profitability);
        let model = &filtered;
        if model.is_empty() {
            report.warn("No data matches the selected filters.");
            return report;
        }

        report.metric(
            "total_cost",
            "Total cost",
            MetricValue::Currency(model.sum(TOTAL_COST)),
        );
        report.metric(
            "unique_products",
            "Unique products",
            MetricValue::Count(distinct_count(model, PRODUCT)),
        );
        report.metric("cost_items", "Cost items", MetricValue::Count(model.len()));
        report.metric(
            "average_cost",
            "Average cost",
            MetricValue::Currency(model.mean(TOTAL_COST).unwrap_or(0.0)),
        );

        if !model.has(TOTAL_COST) {
            report.info("No total cost column found.");
            return report;
        }

        report.breakdown(
            "cost_by_channel",
            "Cost by channel",
            sum_by(model, METHOD, TOTAL_COST),
        );

        let mut by_product = sum_by(model, PRODUCT, TOTAL_COST);
        sort_descending(&mut by_product);
        report.breakdown("cost_by_product", "Cost by product", by_product);

        if let Some(product) = filter.single_product().filter(|_| model.has(METHOD)) {
            channel_breakdowns(&mut report, model, product);
        }

        report
    }
}

/// Cost, profit, ROI and MARGIN per channel of one selected product
fn channel_breakdowns(report: &mut ViewReport, model: &Dataset, product: &str) {
    let summaries = summarize_channels(model);
    let series = |f: fn(&ChannelSummary) -> MetricValue| -> Vec<BreakdownRow> {
        summaries
            .iter()
            .map(|s| BreakdownRow::new(s.channel.clone(), f(s)))
            .collect()
    };

    report.breakdown(
        "product_cost_by_channel",
        format!("{}: cost by channel", product),
        series(|s| MetricValue::Currency(s.cost)),
    );
    report.breakdown(
        "product_profit_by_channel",
        format!("{}: profit by channel", product),
        series(|s| MetricValue::Currency(s.profit)),
    );
    report.breakdown(
        "product_roi_by_channel",
        format!("{}: ROI by channel", product),
        series(|s| MetricValue::Percent(s.average_roi)),
    );
    report.breakdown(
        "product_margin_by_channel",
        format!("{}: MARGIN by channel", product),
        series(|s| MetricValue::Percent(s.average_margin)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::{approx, number, sample_datasets};

    #[test]
    fn test_cost_metrics() {
        let report = CostsView.build(&sample_datasets(), &ViewFilter::default());
        assert!(approx(number(&report, "total_cost"), 101.0));
        assert_eq!(report.get_metric("unique_products"), Some(&MetricValue::Count(3)));
        assert_eq!(report.get_metric("cost_items"), Some(&MetricValue::Count(4)));
        assert!(approx(number(&report, "average_cost"), 25.25));
    }

    #[test]
    fn test_cost_breakdowns() {
        let report = CostsView.build(&sample_datasets(), &ViewFilter::default());

        let by_channel = report.get_breakdown("cost_by_channel").unwrap();
        assert_eq!(by_channel.labels(), vec!["Amazon", "Tienda"]);
        assert_eq!(by_channel.value_of("Tienda"), Some(&MetricValue::Currency(65.0)));

        let by_product = report.get_breakdown("cost_by_product").unwrap();
        assert_eq!(by_product.labels(), vec!["Gizmo", "Gadget", "Widget"]);
        assert_eq!(by_product.value_of("Widget"), Some(&MetricValue::Currency(11.0)));
    }

    #[test]
    fn test_costs_empty() {
        let report = CostsView.build(&Datasets::default(), &ViewFilter::default());
        assert!(report.is_empty());
        assert_eq!(report.notices.len(), 1);
    }

    #[test]
    fn test_no_channel_detail_without_single_product() {
        let report = CostsView.build(&sample_datasets(), &ViewFilter::default());
        assert!(report.get_breakdown("product_cost_by_channel").is_none());

        let two = ViewFilter::new().with_products(["Widget", "Gadget"]);
        let report = CostsView.build(&sample_datasets(), &two);
        assert!(report.get_breakdown("product_roi_by_channel").is_none());
        assert!(approx(number(&report, "total_cost"), 41.0));
    }

    #[test]
    fn test_single_product_channel_detail() {
        let filter = ViewFilter::new().with_products(["Widget"]);
        let report = CostsView.build(&sample_datasets(), &filter);

        assert!(approx(number(&report, "total_cost"), 11.0));
        assert_eq!(report.get_metric("unique_products"), Some(&MetricValue::Count(1)));

        let cost = report.get_breakdown("product_cost_by_channel").unwrap();
        assert_eq!(cost.title, "Widget: cost by channel");
        assert_eq!(cost.labels(), vec!["Amazon", "Tienda"]);
        assert_eq!(cost.value_of("Tienda"), Some(&MetricValue::Currency(5.0)));

        let profit = report.get_breakdown("product_profit_by_channel").unwrap();
        assert_eq!(profit.value_of("Amazon"), Some(&MetricValue::Currency(4.0)));

        let roi = report.get_breakdown("product_roi_by_channel").unwrap();
        assert!(approx(roi.value_of("Tienda").and_then(MetricValue::as_f64).unwrap(), 1.4));

        let margin = report.get_breakdown("product_margin_by_channel").unwrap();
        assert!(approx(margin.value_of("Amazon").and_then(MetricValue::as_f64).unwrap(), 0.4));
    }

    #[test]
    fn test_method_filter_on_costs() {
        let filter = ViewFilter::new().with_methods(["Tienda"]);
        let report = CostsView.build(&sample_datasets(), &filter);
        assert!(approx(number(&report, "total_cost"), 65.0));
        let by_channel = report.get_breakdown("cost_by_channel").unwrap();
        assert_eq!(by_channel.labels(), vec!["Tienda"]);
    }
}
