//! Nominal column schemas of the source sheets
//!
//! Header text in the spreadsheet drifts (units in parentheses, accents,
//! extra words), so most fields are found by a distinctive fragment rather
//! than the full name.

/// How a column's cells are typed after loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Monetary,
    Percent,
    Date,
}

/// One semantic column of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Stable key used by code
    pub key: &'static str,
    /// Fragment matched case-insensitively against the real header
    pub pattern: &'static str,
    /// Name the column is expected to have
    pub nominal: &'static str,
    pub kind: FieldKind,
    /// Match the nominal name exactly instead of by fragment
    pub exact: bool,
}

const fn field(key: &'static str, pattern: &'static str, nominal: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        key,
        pattern,
        nominal,
        kind,
        exact: false,
    }
}

const fn exact(key: &'static str, nominal: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        key,
        pattern: nominal,
        nominal,
        kind,
        exact: true,
    }
}

pub mod sales {
    use super::{FieldKind::*, FieldSpec, exact, field};

    pub const TABLE: &str = "ventas";
    pub const PRODUCT: &str = "product";
    pub const CATEGORY: &str = "category";
    pub const DATE: &str = "date";
    pub const QUANTITY: &str = "quantity";
    pub const UNIT_PRICE: &str = "unit_price";
    pub const REVENUE: &str = "revenue";
    pub const PAYMENT_METHOD: &str = "payment_method";
    /// Derived `YYYY-MM` of the sale date
    pub const MONTH: &str = "month";
    pub const MONTH_COLUMN: &str = "Mes";

    pub const FIELDS: &[FieldSpec] = &[
        exact(PRODUCT, "Producto", Text),
        field(CATEGORY, "Categor", "Categoría", Text),
        field(DATE, "Fecha de Venta", "Fecha de Venta", Date),
        field(QUANTITY, "Cantidad Vendida", "Cantidad Vendida", Monetary),
        field(UNIT_PRICE, "Precio Unitario", "Precio Unitario (USD)", Monetary),
        field(REVENUE, "Ingreso Total", "Ingreso Total (USD)", Monetary),
        field(PAYMENT_METHOD, "todo de Pago", "Método de Pago", Text),
    ];
}

pub mod expenses {
    use super::{FieldKind::*, FieldSpec, field};

    pub const TABLE: &str = "gastos";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const DATE: &str = "date";
    pub const AMOUNT: &str = "amount";
    pub const PAID: &str = "paid";
    pub const SUPPLIER: &str = "supplier";

    pub const FIELDS: &[FieldSpec] = &[
        field(DESCRIPTION, "Descripci", "Descripción del Costo", Text),
        field(CATEGORY, "Categor", "Categoría del Gasto", Text),
        field(DATE, "Fecha de Pago", "Fecha de Pago", Date),
        field(AMOUNT, "Monto", "Monto (USD)", Monetary),
        field(PAID, "Pagado", "¿Pagado?", Text),
        field(SUPPLIER, "Proveedor", "Proveedor", Text),
    ];
}

pub mod profitability {
    use super::{FieldKind::*, FieldSpec, exact, field};

    pub const TABLE: &str = "rentabilidad";
    pub const PRODUCT: &str = "product";
    pub const METHOD: &str = "method";
    pub const PURCHASE_USD: &str = "purchase_usd";
    pub const TOTAL_COST: &str = "total_cost";
    pub const SALE_PRICE: &str = "sale_price";
    pub const PROFIT: &str = "profit";
    pub const MARGIN: &str = "margin";
    pub const ROI: &str = "roi";

    pub const FIELDS: &[FieldSpec] = &[
        exact(PRODUCT, "Producto", Text),
        field(METHOD, "todo de venta", "Método de venta", Text),
        field(
            PURCHASE_USD,
            "compra del producto (USD)",
            "Precio de compra del producto (USD)",
            Monetary,
        ),
        field(TOTAL_COST, "Costo Total", "Costo Total", Monetary),
        field(SALE_PRICE, "Precio de venta", "Precio de venta (USD)", Monetary),
        field(PROFIT, "Ganancias", "Ganancias (USD)", Monetary),
        exact(MARGIN, "MARGIN", Percent),
        exact(ROI, "ROI", Percent),
    ];
}

pub mod orders {
    use super::{FieldKind::*, FieldSpec, exact, field};

    pub const TABLE: &str = "pedidos";
    pub const REFERENCE: &str = "reference";
    pub const PRODUCT: &str = "product";
    pub const SUPPLIER: &str = "supplier";
    pub const QUANTITY: &str = "quantity";
    pub const TOTAL_COST: &str = "total_cost";
    pub const ARRIVAL: &str = "arrival";
    pub const CONFIRMED: &str = "confirmed";
    /// Derived confirmation state column
    pub const STATUS: &str = "status";
    pub const STATUS_COLUMN: &str = "Estado";
    pub const STATUS_CONFIRMED: &str = "Confirmado";
    pub const STATUS_PENDING: &str = "Pendiente";

    /// Upper-cased values that mark an order as confirmed
    pub const CONFIRMED_VALUES: &[&str] = &["SI", "SÍ", "YES", "TRUE", "VERDADERO", "1"];

    pub const FIELDS: &[FieldSpec] = &[
        field(REFERENCE, "Referencia", "Referencia del Pedido", Text),
        exact(PRODUCT, "Producto", Text),
        exact(SUPPLIER, "Proveedor", Text),
        field(QUANTITY, "Cantidad Solicitada", "Cantidad Solicitada", Monetary),
        field(
            TOTAL_COST,
            "Costo Total Estimado",
            "Costo Total Estimado (USD)",
            Monetary,
        ),
        field(ARRIVAL, "Fecha Estimada", "Fecha Estimada de Llegada", Date),
        field(CONFIRMED, "Pedido Confirmado", "¿Pedido Confirmado?", Text),
    ];
}

pub mod suppliers {
    use super::{FieldKind::*, FieldSpec, exact};

    pub const TABLE: &str = "proveedores";
    pub const NAME: &str = "name";
    pub const KIND: &str = "kind";
    pub const PHONE: &str = "phone";
    pub const CONTACT: &str = "contact";
    pub const WEBSITE: &str = "website";
    pub const RELIABILITY: &str = "reliability";
    pub const NOTES: &str = "notes";

    pub const FIELDS: &[FieldSpec] = &[
        exact(NAME, "Proveedor", Text),
        exact(KIND, "Tipo de proveedor", Text),
        exact(PHONE, "Telefono", Text),
        exact(CONTACT, "Contacto", Text),
        exact(WEBSITE, "Sitio web", Text),
        exact(RELIABILITY, "Confiabilidad", Text),
        exact(NOTES, "Notas", Text),
    ];
}
