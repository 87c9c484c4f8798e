//! Row selections for the filtered views
//!
//! A filter never touches the loaded datasets; each view asks for a
//! filtered copy of the dataset it shows. Empty selections keep every row,
//! and a selection over a column the sheet does not have is ignored.

use crate::datasets::Dataset;
use crate::schema::{orders, profitability, suppliers};

/// Which orders to show by confirmation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Confirmed,
    Pending,
}

impl StatusFilter {
    fn matches(self, status: Option<&str>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Confirmed => status == Some(orders::STATUS_CONFIRMED),
            StatusFilter::Pending => status != Some(orders::STATUS_CONFIRMED),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Products to keep in profitability, costs and orders
    pub products: Vec<String>,
    /// Sale methods to keep in profitability and costs
    pub methods: Vec<String>,
    pub status: StatusFilter,
    /// Supplier types to keep in the supplier directory
    pub supplier_types: Vec<String>,
    /// Case-insensitive text searched across every supplier column
    pub search: Option<String>,
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_supplier_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supplier_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// The product when exactly one is selected
    pub fn single_product(&self) -> Option<&str> {
        match self.products.as_slice() {
            [product] => Some(product.trim()),
            _ => None,
        }
    }

    /// Whether the profitability selections drop anything
    pub fn narrows_profitability(&self) -> bool {
        !self.products.is_empty() || !self.methods.is_empty()
    }

    pub fn narrows_orders(&self) -> bool {
        !self.products.is_empty() || self.status != StatusFilter::All
    }

    pub fn narrows_suppliers(&self) -> bool {
        self.search_needle().is_some() || !self.supplier_types.is_empty()
    }

    /// Profitability rows matching the product and method selections
    pub fn profitability(&self, model: &Dataset) -> Dataset {
        model.filtered(|row| {
            selected(model, row, profitability::PRODUCT, &self.products)
                && selected(model, row, profitability::METHOD, &self.methods)
        })
    }

    /// Orders matching the status and product selections
    pub fn orders(&self, book: &Dataset) -> Dataset {
        book.filtered(|row| {
            self.status.matches(book.text(row, orders::STATUS))
                && selected(book, row, orders::PRODUCT, &self.products)
        })
    }

    /// Suppliers matching the search text and type selection
    pub fn suppliers(&self, directory: &Dataset) -> Dataset {
        let needle = self.search_needle();
        directory.filtered(|row| {
            needle
                .as_ref()
                .is_none_or(|n| directory.row_text(row).to_lowercase().contains(n.as_str()))
                && selected(directory, row, suppliers::KIND, &self.supplier_types)
        })
    }

    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Rows with a blank value never match a non-empty selection.
fn selected(dataset: &Dataset, row: usize, key: &str, selection: &[String]) -> bool {
    if selection.is_empty() || !dataset.has(key) {
        return true;
    }
    dataset
        .text(row, key)
        .is_some_and(|value| selection.iter().any(|s| s.trim() == value))
}
