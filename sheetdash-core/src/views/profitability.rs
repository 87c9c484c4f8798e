//! Per-unit profitability by product and sale method

use super::{BreakdownRow, DashboardView, MetricValue, ViewFilter, ViewReport};
use crate::datasets::{Dataset, Datasets};
use crate::schema::profitability::*;

pub struct ProfitabilityView;

impl DashboardView for ProfitabilityView {
    fn id(&self) -> &'static str {
        "profitability"
    }

    fn title(&self) -> &'static str {
        "Unit Profitability"
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
        let mean = |key: &str| model.mean(key).unwrap_or(0.0);

        report.metric("average_roi", "Average ROI", MetricValue::Percent(mean(ROI)));
        report.metric(
            "average_margin",
            "Average MARGIN",
            MetricValue::Percent(mean(MARGIN)),
        );
        report.metric(
            "average_unit_profit",
            "Average unit profit",
            MetricValue::Currency(mean(PROFIT)),
        );
        report.metric(
            "average_sale_price",
            "Average sale price",
            MetricValue::Currency(mean(SALE_PRICE)),
        );

        if model.has(ROI) {
            let roi_rows = (0..model.len())
                .filter_map(|row| {
                    let roi = model.number(row, ROI)?;
                    Some(BreakdownRow::new(row_label(model, row), MetricValue::Percent(roi)))
                })
                .collect();
            report.breakdown("roi_by_product", "ROI by product and method", roi_rows);
        }
        if model.has(MARGIN) {
            let margin_rows = (0..model.len())
                .filter_map(|row| {
                    let margin = model.number(row, MARGIN)?;
                    Some(BreakdownRow::new(row_label(model, row), MetricValue::Percent(margin)))
                })
                .collect();
            report.breakdown("margin_by_product", "MARGIN by product and method", margin_rows);
        }

        if let Some((best, worst)) = roi_extremes(model) {
            report.metric(
                "best_roi_product",
                "Best ROI",
                MetricValue::Text(row_label(model, best)),
            );
            report.metric(
                "best_roi",
                "Best ROI value",
                MetricValue::Percent(model.number(best, ROI).unwrap_or(0.0)),
            );
            report.metric(
                "worst_roi_product",
                "Worst ROI",
                MetricValue::Text(row_label(model, worst)),
            );
            report.metric(
                "worst_roi",
                "Worst ROI value",
                MetricValue::Percent(model.number(worst, ROI).unwrap_or(0.0)),
            );
        }

        report
    }
}

/// "Product (method)", or just the product when the method is blank
fn row_label(model: &Dataset, row: usize) -> String {
    let product = model.text(row, PRODUCT).unwrap_or("N/A");
    match model.text(row, METHOD) {
        Some(method) => format!("{} ({})", product, method),
        None => product.to_string(),
    }
}

/// Rows with the highest and lowest ROI; the first row wins ties.
fn roi_extremes(model: &Dataset) -> Option<(usize, usize)> {
    let mut rows = (0..model.len()).filter_map(|row| model.number(row, ROI).map(|roi| (row, roi)));
    let first = rows.next()?;
    let (best, worst) = rows.fold((first, first), |(best, worst), current| {
        let best = if current.1 > best.1 { current } else { best };
        let worst = if current.1 < worst.1 { current } else { worst };
        (best, worst)
    });
    Some((best.0, worst.0))
}
