//! sheetdash-core: ingestion and reporting core for a spreadsheet dashboard
//!
//! Raw worksheet grids come in through a [`GridSource`], get normalized into
//! [`NormalizedTable`]s by the sheet loaders, are typed into [`Datasets`],
//! and are finally summarized by the dashboard views.

pub mod config;
pub mod datasets;
pub mod error;
pub mod export;
pub mod grid;
pub mod loader;
pub mod notice;
pub mod parse;
pub mod schema;
pub mod source;
pub mod table;
pub mod views;

pub use config::DashboardConfig;
pub use datasets::{Dataset, Datasets, LoadedTables};
pub use error::{LoadError, SourceError};
pub use notice::{Notice, NoticeScope, Notices, Severity};
pub use parse::ParseDiagnostics;
pub use source::GridSource;
pub use table::{NormalizedTable, Value};
pub use views::{DashboardView, MetricValue, StatusFilter, ViewFilter, ViewReport};

use serde::Serialize;
use tracing::{info, warn};

/// Everything one rendering pass loaded from the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub document: String,
    pub datasets: Datasets,
    pub notices: Notices,
    pub diagnostics: ParseDiagnostics,
}

/// Result of a full rendering pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub document: String,
    pub notices: Notices,
    pub diagnostics: ParseDiagnostics,
    pub views: Vec<ViewReport>,
}

/// Main dashboard interface
pub struct Dashboard {
    config: DashboardConfig,
    views: Vec<Box<dyn DashboardView>>,
    filter: ViewFilter,
}

impl Dashboard {
    /// Create a dashboard with the built-in layout
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    /// Create a dashboard with a custom configuration and all views
    pub fn with_config(config: DashboardConfig) -> Self {
        let views = views::registry::create_all_views();
        Self {
            config,
            views,
            filter: ViewFilter::default(),
        }
    }

    /// Restrict rendering to the views in `ids`; empty keeps all of them
    pub fn with_views(mut self, ids: &[String]) -> Self {
        self.views = views::registry::create_selected_views(ids);
        self
    }

    /// Narrow the filtered views to a selection of rows
    pub fn with_filter(mut self, filter: ViewFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Fetch and normalize the four sheets, one after another.
    ///
    /// Only a missing document aborts the pass; every other problem is
    /// reported through [`DashboardData::notices`].
    pub fn load(&self, source: &dyn GridSource) -> Result<DashboardData, LoadError> {
        let config = &self.config;
        let sheets = &config.sheets;
        let mut notices = Notices::new();

        let (sales, expenses) =
            loader::load_dual_table(source, &sheets.sales, config, &mut notices)?;
        let profitability =
            loader::load_sheet(source, &sheets.profitability, config, &mut notices)?;
        let orders = loader::load_sheet(source, &sheets.orders, config, &mut notices)?;
        let suppliers = loader::load_sheet(source, &sheets.suppliers, config, &mut notices)?;

        let loaded = LoadedTables {
            sales,
            expenses,
            profitability,
            orders,
            suppliers,
        };

        let mut diagnostics = ParseDiagnostics::new();
        let datasets = Datasets::build(loaded, config, &mut diagnostics);

        if !diagnostics.is_empty() {
            warn!(cells = diagnostics.total(), "cells fell back to default values");
            notices.info(
                NoticeScope::Document,
                format!(
                    "{} cell(s) could not be parsed and were read as zero or blank.",
                    diagnostics.total()
                ),
            );
        }

        info!(
            document = source.document(),
            notices = notices.len(),
            "rendering pass loaded"
        );

        Ok(DashboardData {
            document: source.document().to_string(),
            datasets,
            notices,
            diagnostics,
        })
    }

    /// Compute the selected views over already loaded data
    pub fn render(&self, data: &DashboardData) -> Vec<ViewReport> {
        self.views
            .iter()
            .map(|view| view.build(&data.datasets, &self.filter))
            .collect()
    }

    /// Load and render in one pass
    pub fn run(&self, source: &dyn GridSource) -> Result<(DashboardData, DashboardReport), LoadError> {
        let data = self.load(source)?;
        let report = DashboardReport {
            document: data.document.clone(),
            notices: data.notices.clone(),
            diagnostics: data.diagnostics.clone(),
            views: self.render(&data),
        };
        Ok((data, report))
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::test_grid as grid;
    use crate::source::MemorySource;

    fn vendidos() -> crate::grid::RawGrid {
        grid(&[
            &["", "VENTAS", "", "", "GASTOS"],
            &["", "Producto", "Ingreso Total (USD)", "", "Descripción del Costo", "Monto (USD)"],
            &["", "Total", "$999", "", "Envío", "$15"],
            &["", "Widget", "$20", "", "Empaque", "n/a"],
        ])
    }

    fn config() -> DashboardConfig {
        let mut config = DashboardConfig::default();
        config.dual_table.left = table::ColumnWindow::new(1, 2);
        config.dual_table.right = table::ColumnWindow::new(4, 5);
        config
    }

    #[test]
    fn test_load_collects_notices_and_diagnostics() {
        let source = MemorySource::new("Finanzas")
            .with_sheet("Vendidos", vendidos())
            .with_failure("Pedidos", "timeout");
        let dashboard = Dashboard::with_config(config());
        let data = dashboard.load(&source).unwrap();

        assert_eq!(data.document, "Finanzas");
        assert_eq!(data.datasets.sales.len(), 1);
        assert_eq!(data.datasets.sales.sum(schema::sales::REVENUE), 20.0);
        assert_eq!(data.datasets.expenses.len(), 2);
        assert_eq!(data.diagnostics.failures_for("gastos", "Monto (USD)"), 1);

        // Two missing sheets, one failed fetch, one diagnostics summary.
        assert_eq!(data.notices.count(Severity::Warning), 2);
        assert_eq!(data.notices.count(Severity::Error), 1);
        assert_eq!(data.notices.count(Severity::Info), 1);
    }

    #[test]
    fn test_missing_document_aborts() {
        let source = MemorySource::new("Finanzas").document_missing();
        let result = Dashboard::new().load(&source);
        assert!(matches!(result, Err(LoadError::DocumentNotFound { .. })));
    }

    #[test]
    fn test_run_renders_selected_views() {
        let source = MemorySource::new("Finanzas").with_sheet("Vendidos", vendidos());
        let dashboard = Dashboard::with_config(config()).with_views(&["overview".to_string()]);
        let (_, report) = dashboard.run(&source).unwrap();

        assert_eq!(report.views.len(), 1);
        let overview = &report.views[0];
        assert_eq!(overview.id, "overview");
        assert_eq!(overview.get_metric("total_sales"), Some(&MetricValue::Currency(20.0)));
        assert_eq!(overview.get_metric("total_expenses"), Some(&MetricValue::Currency(15.0)));
    }

    #[test]
    fn test_filter_reaches_views() {
        let source = MemorySource::new("Finanzas").with_sheet(
            "Pedidos",
            grid(&[
                &["Referencia del Pedido", "Producto", "Cantidad Solicitada", "¿Pedido Confirmado?"],
                &["P-1", "Widget", "3", "SI"],
                &["P-2", "Gadget", "5", "No"],
            ]),
        );
        let dashboard = Dashboard::new()
            .with_views(&["orders".to_string()])
            .with_filter(ViewFilter::new().with_status(StatusFilter::Pending));
        let (data, report) = dashboard.run(&source).unwrap();

        // Loaded data is never filtered.
        assert_eq!(data.datasets.orders.len(), 2);
        let orders = &report.views[0];
        assert_eq!(orders.get_metric("total_orders"), Some(&MetricValue::Count(2)));
        assert_eq!(orders.get_metric("pending"), Some(&MetricValue::Count(1)));
        // Detail figures only see the pending order.
        assert_eq!(orders.get_metric("total_units"), Some(&MetricValue::Count(5)));
        let units = orders.get_breakdown("units_by_product").unwrap();
        assert_eq!(units.labels(), vec!["Gadget"]);
    }
}
