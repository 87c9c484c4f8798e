//! Worksheet data sources
//!
//! The ingestion layer only needs one operation from a source: fetch every
//! cell of a named worksheet as strings. Transport and credentials stay
//! behind the [`GridSource`] trait.

pub mod cache;
pub mod memory;
#[cfg(feature = "sheets-api")]
pub mod sheets_api;
pub mod workbook;

use crate::error::SourceError;
use crate::grid::RawGrid;

pub use cache::CachedSource;
pub use memory::MemorySource;
#[cfg(feature = "sheets-api")]
pub use sheets_api::SheetsApiSource;
pub use workbook::WorkbookSource;

/// Trait that all worksheet sources must implement
pub trait GridSource: Send + Sync {
    /// Name of the document, for messages
    fn document(&self) -> &str;

    /// Fetch all cell values of `sheet`
    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, SourceError>;
}

impl<T: GridSource + ?Sized> GridSource for Box<T> {
    fn document(&self) -> &str {
        (**self).document()
    }

    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, SourceError> {
        (**self).fetch_grid(sheet)
    }
}
