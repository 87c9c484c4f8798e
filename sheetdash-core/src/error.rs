//! Error types for data sources and rendering passes

use thiserror::Error;

/// Failure signals a [`GridSource`](crate::source::GridSource) can raise.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The worksheet does not exist in the document
    #[error("worksheet '{sheet}' not found")]
    SheetNotFound { sheet: String },

    /// The document itself cannot be located or opened
    #[error("spreadsheet '{document}' not found")]
    DocumentNotFound { document: String },

    /// Any other fetch failure
    #[error("failed to fetch worksheet '{sheet}': {message}")]
    Transport { sheet: String, message: String },
}

/// The only error that aborts a rendering pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("spreadsheet '{document}' not found; nothing can be shown")]
    DocumentNotFound { document: String },
}
