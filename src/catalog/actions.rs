use crate::domain::Product;

/// Stock operations applied to a single product inside the catalog actor.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Removes `amount` units, failing if that would take stock below zero.
    DecrementStock(u32),
    /// Returns `amount` units. Only used to compensate a failed order write.
    Restock(u32),
}

/// Results from ProductActions
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    StockLevel(u32),
    Updated(Product),
}
