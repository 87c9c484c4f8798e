//! Dashboard configuration
//!
//! Everything the ingestion layer needs to know about the spreadsheet's
//! physical layout lives here and is passed explicitly to the loaders.

use crate::parse::{MonthTable, spanish_months};
use crate::table::ColumnWindow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Display name of the spreadsheet document
    pub document: String,
    /// Header marker for sheets without an entry in `markers`
    pub default_marker: String,
    /// Sheet name -> header marker token
    pub markers: HashMap<String, String>,
    pub sheets: SheetNames,
    pub dual_table: DualTableLayout,
    /// Month name -> month number, for "MONTH YEAR" dates
    pub months: HashMap<String, u32>,
    /// Lifetime of cached worksheet fetches
    pub cache_ttl_secs: u64,
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: DashboardConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Header marker token for `sheet`
    pub fn marker_for(&self, sheet: &str) -> &str {
        self.markers
            .get(sheet)
            .map(String::as_str)
            .unwrap_or(&self.default_marker)
    }

    /// Month table with upper-cased keys
    pub fn month_table(&self) -> MonthTable {
        self.months
            .iter()
            .map(|(name, month)| (name.trim().to_uppercase(), *month))
            .collect()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Validate layout constants
    pub fn validate(&self) -> Result<()> {
        let DualTableLayout { left, right, .. } = &self.dual_table;
        for (label, window) in [("left", left), ("right", right)] {
            if window.start > window.end {
                anyhow::bail!(
                    "Configuration error: dual_table.{} window starts after it ends ({} > {})",
                    label,
                    window.start,
                    window.end
                );
            }
        }
        if left.overlaps(right) {
            anyhow::bail!(
                "Configuration error: dual_table windows {}..={} and {}..={} overlap",
                left.start,
                left.end,
                right.start,
                right.end
            );
        }

        for (name, month) in &self.months {
            if !(1..=12).contains(month) {
                anyhow::bail!(
                    "Configuration error: month '{}' maps to {}, expected 1..=12",
                    name,
                    month
                );
            }
        }

        if self.default_marker.trim().is_empty() {
            anyhow::bail!("Configuration error: default_marker must not be blank");
        }
        for (sheet, marker) in &self.markers {
            if marker.trim().is_empty() {
                anyhow::bail!(
                    "Configuration error: marker for sheet '{}' must not be blank",
                    sheet
                );
            }
        }

        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let sheets = SheetNames::default();
        let mut markers = HashMap::new();
        markers.insert(sheets.suppliers.clone(), "Proveedor".to_string());

        Self {
            document: "Finanzas MORAES".to_string(),
            default_marker: "Producto".to_string(),
            markers,
            sheets,
            dual_table: DualTableLayout::default(),
            months: spanish_months(),
            cache_ttl_secs: 60,
        }
    }
}

/// Worksheet names of the four source sheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    /// Dual-table sheet: sales on the left, expenses on the right
    pub sales: String,
    pub profitability: String,
    pub orders: String,
    pub suppliers: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            sales: "Vendidos".to_string(),
            profitability: "Modelo Unitario de Rentabilidad".to_string(),
            orders: "Pedidos".to_string(),
            suppliers: "proveedores".to_string(),
        }
    }
}

/// Column windows of the dual-table sheet.
///
/// These follow the spreadsheet's manual layout; nothing in the sheet marks
/// where one block ends and the other begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualTableLayout {
    /// Header marker shared by both blocks
    pub marker: String,
    pub left: ColumnWindow,
    pub right: ColumnWindow,
}

impl Default for DualTableLayout {
    fn default() -> Self {
        Self {
            marker: "Producto".to_string(),
            left: ColumnWindow::new(1, 8),
            right: ColumnWindow::new(13, 20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let config = DashboardConfig::default();
        assert_eq!(config.marker_for("proveedores"), "Proveedor");
        assert_eq!(config.marker_for("Pedidos"), "Producto");
        assert_eq!(config.marker_for("Anything"), "Producto");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
document = "Otra Hoja"
cache_ttl_secs = 5

[dual_table]
left = { start = 0, end = 6 }
"#,
        )
        .unwrap();
        assert_eq!(config.document, "Otra Hoja");
        assert_eq!(config.cache_ttl(), Duration::from_secs(5));
        assert_eq!(config.dual_table.left, ColumnWindow::new(0, 6));
        assert_eq!(config.dual_table.right, ColumnWindow::new(13, 20));
        assert_eq!(config.dual_table.marker, "Producto");
        assert_eq!(config.sheets.sales, "Vendidos");
        assert_eq!(config.month_table().get("MARZO"), Some(&3));
    }

    #[test]
    fn test_month_table_is_upper_cased() {
        let config: DashboardConfig = toml::from_str(
            r#"
[months]
january = 1
"#,
        )
        .unwrap();
        let months = config.month_table();
        assert_eq!(months.get("JANUARY"), Some(&1));
        assert_eq!(months.len(), 1);
    }

    #[test]
    fn test_validation() {
        let config = DashboardConfig::default();

        let mut bad = config.clone();
        bad.dual_table.right = ColumnWindow::new(5, 10);
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.dual_table.left = ColumnWindow::new(8, 1);
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.months.insert("TRECEMBRE".to_string(), 13);
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.markers.insert("Pedidos".to_string(), "  ".to_string());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheetdash.toml");
        fs::write(&path, "default_marker = \"Item\"\n[markers]\nproveedores = \"Proveedor\"\n")
            .unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.marker_for("Pedidos"), "Item");
        assert_eq!(config.marker_for("proveedores"), "Proveedor");
        assert!(DashboardConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
