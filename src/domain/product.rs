use rust_decimal::Decimal;

use super::{MediaRef, ProductId};

/// A product listed in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub photo: Option<MediaRef>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Payload for creating a new product. The catalog assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCreate {
    pub photo: Option<MediaRef>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
}
