//! Sale channel comparison

use super::{
    BreakdownRow, DashboardView, MetricValue, ViewFilter, ViewReport, group_rows, mean_rows,
    sum_rows,
};
use crate::datasets::{Dataset, Datasets};
use crate::schema::profitability::*;

pub struct ChannelsView;

/// Aggregates of one sale method
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSummary {
    pub channel: String,
    pub average_roi: f64,
    pub average_margin: f64,
    pub profit: f64,
    pub cost: f64,
    pub products: usize,
    pub revenue: f64,
}

/// Summaries per sale method, in order of first appearance
pub fn summarize_channels(model: &Dataset) -> Vec<ChannelSummary> {
    group_rows(model, METHOD)
        .into_iter()
        .map(|(channel, rows)| ChannelSummary {
            average_roi: mean_rows(model, &rows, ROI),
            average_margin: mean_rows(model, &rows, MARGIN),
            profit: sum_rows(model, &rows, PROFIT),
            cost: sum_rows(model, &rows, TOTAL_COST),
            products: rows.len(),
            revenue: sum_rows(model, &rows, SALE_PRICE),
            channel,
        })
        .collect()
}

impl DashboardView for ChannelsView {
    fn id(&self) -> &'static str {
        "channels"
    }

    fn title(&self) -> &'static str {
        "Sales Channel Comparison"
    }

    fn build(&self, data: &Datasets, _filter: &ViewFilter) -> ViewReport {
        let model = &data.profitability;
        if model.is_empty() {
            return ViewReport::no_data(self.id(), self.title(), "Modelo Unitario de Rentabilidad");
        }

        let mut report = ViewReport::new(self.id(), self.title());
        if !model.has(METHOD) {
            report.info("No sale method column found; channels cannot be compared.");
            return report;
        }

        let summaries = summarize_channels(model);
        report.metric("channels", "Channels", MetricValue::Count(summaries.len()));

        // First channel wins ties.
        let best = summaries.iter().fold(None::<&ChannelSummary>, |best, s| match best {
            Some(b) if b.average_roi >= s.average_roi => Some(b),
            _ => Some(s),
        });
        if let Some(best) = best {
            report.metric(
                "recommended_channel",
                "Recommended channel",
                MetricValue::Text(best.channel.clone()),
            );
            report.metric(
                "recommended_channel_roi",
                "Recommended channel ROI",
                MetricValue::Percent(best.average_roi),
            );
        }

        let series = |f: fn(&ChannelSummary) -> MetricValue| -> Vec<BreakdownRow> {
            summaries
                .iter()
                .map(|s| BreakdownRow::new(s.channel.clone(), f(s)))
                .collect()
        };
        report.breakdown(
            "roi_by_channel",
            "Average ROI by channel",
            series(|s| MetricValue::Percent(s.average_roi)),
        );
        report.breakdown(
            "margin_by_channel",
            "Average MARGIN by channel",
            series(|s| MetricValue::Percent(s.average_margin)),
        );
        report.breakdown(
            "profit_by_channel",
            "Profit by channel",
            series(|s| MetricValue::Currency(s.profit)),
        );
        report.breakdown(
            "cost_by_channel",
            "Cost by channel",
            series(|s| MetricValue::Currency(s.cost)),
        );
        report.breakdown(
            "products_by_channel",
            "Products by channel",
            series(|s| MetricValue::Count(s.products)),
        );
        report.breakdown(
            "revenue_by_channel",
            "Revenue by channel",
            series(|s| MetricValue::Currency(s.revenue)),
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::{approx, sample_datasets};

    #[test]
    fn test_channel_summaries() {
        let data = sample_datasets();
        let summaries = summarize_channels(&data.profitability);
        assert_eq!(summaries.len(), 2);

        let amazon = &summaries[0];
        assert_eq!(amazon.channel, "Amazon");
        assert!(approx(amazon.average_roi, 0.65));
        assert!(approx(amazon.average_margin, 0.4));
        assert!(approx(amazon.profit, 24.0));
        assert!(approx(amazon.cost, 36.0));
        assert_eq!(amazon.products, 2);
        assert!(approx(amazon.revenue, 60.0));

        let tienda = &summaries[1];
        assert!(approx(tienda.average_roi, 0.95));
        assert!(approx(tienda.average_margin, 0.475));
        assert!(approx(tienda.revenue, 112.0));
    }

    #[test]
    fn test_recommended_channel() {
        let report = ChannelsView.build(&sample_datasets(), &ViewFilter::default());
        assert_eq!(
            report.get_metric("recommended_channel"),
            Some(&MetricValue::Text("Tienda".into()))
        );
        assert_eq!(report.get_metric("channels"), Some(&MetricValue::Count(2)));
        assert_eq!(report.breakdowns.len(), 6);
        assert_eq!(
            report.get_breakdown("products_by_channel").unwrap().value_of("Amazon"),
            Some(&MetricValue::Count(2))
        );
    }

    #[test]
    fn test_channels_empty() {
        let report = ChannelsView.build(&Datasets::default(), &ViewFilter::default());
        assert!(report.is_empty());
        assert_eq!(report.notices.len(), 1);
    }
}
