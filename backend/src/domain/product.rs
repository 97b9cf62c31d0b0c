//! Stocked products.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// A product held in stock.
///
/// `price` is an exact decimal and serialises as a string so that values
/// such as `19.99` survive the round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Product {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Brand or trade name.
    pub name: String,
    /// Owning category.
    pub category_id: i64,
    /// Generic (non-proprietary) name.
    pub generic_name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Unit price.
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    /// Units on hand.
    pub stock: i32,
    /// Dispensing unit, such as `box` or `bottle`.
    pub unit: String,
    /// Expiry date of the current batch.
    pub expiration_date: NaiveDate,
    /// Barcode printed on the packaging.
    pub barcode: String,
    /// Supplier the product is bought from.
    pub supplier_id: i64,
    /// Reorder threshold.
    pub min_stock: i32,
    /// Whether the product is offered for sale.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Attributes used to create or replace a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Brand or trade name.
    pub name: String,
    /// Owning category.
    pub category_id: i64,
    /// Generic name.
    pub generic_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Units on hand.
    pub stock: i32,
    /// Dispensing unit.
    pub unit: String,
    /// Expiry date of the current batch.
    pub expiration_date: NaiveDate,
    /// Packaging barcode.
    pub barcode: String,
    /// Supplier.
    pub supplier_id: i64,
    /// Reorder threshold.
    pub min_stock: i32,
    /// Whether the product is offered for sale.
    pub is_active: bool,
}
