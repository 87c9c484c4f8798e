//! In-memory source for tests and embedding

use super::GridSource;
use crate::error::SourceError;
use crate::grid::RawGrid;
use std::collections::HashMap;

/// Serves grids from a map; can simulate each failure signal.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    document: String,
    sheets: HashMap<String, RawGrid>,
    failures: HashMap<String, String>,
    document_missing: bool,
}

impl MemorySource {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            ..Self::default()
        }
    }

    /// Add or replace a worksheet
    pub fn with_sheet(mut self, name: impl Into<String>, grid: RawGrid) -> Self {
        self.sheets.insert(name.into(), grid);
        self
    }

    /// Make fetches of `sheet` fail with a transport error
    pub fn with_failure(mut self, sheet: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(sheet.into(), message.into());
        self
    }

    /// Make every fetch report the document as missing
    pub fn document_missing(mut self) -> Self {
        self.document_missing = true;
        self
    }
}

impl GridSource for MemorySource {
    fn document(&self) -> &str {
        &self.document
    }

    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, SourceError> {
        if self.document_missing {
            return Err(SourceError::DocumentNotFound {
                document: self.document.clone(),
            });
        }
        if let Some(message) = self.failures.get(sheet) {
            return Err(SourceError::Transport {
                sheet: sheet.to_string(),
                message: message.clone(),
            });
        }
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| SourceError::SheetNotFound {
                sheet: sheet.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals() {
        let source = MemorySource::new("Libro")
            .with_sheet("Pedidos", vec![vec!["Producto".to_string()]])
            .with_failure("Vendidos", "timeout");

        assert_eq!(source.fetch_grid("Pedidos").unwrap().len(), 1);
        assert!(matches!(
            source.fetch_grid("proveedores"),
            Err(SourceError::SheetNotFound { .. })
        ));
        assert!(matches!(
            source.fetch_grid("Vendidos"),
            Err(SourceError::Transport { .. })
        ));

        let missing = source.document_missing();
        assert_eq!(
            missing.fetch_grid("Pedidos"),
            Err(SourceError::DocumentNotFound {
                document: "Libro".to_string()
            })
        );
    }
}
