use rust_decimal::Decimal;

use super::actions::{ProductAction, ProductActionResult};
use super::error::CatalogError;
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductId};

impl Entity for Product {
    type Id = ProductId;
    type CreateParams = ProductCreate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = CatalogError;

    /// Creates a new Product, re-checking the invariants the wizard already enforced.
    ///
    /// # Errors
    /// `ValidationError` for a blank name or a non-positive price.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, CatalogError> {
        if params.name.trim().is_empty() {
            return Err(CatalogError::ValidationError("name must not be empty".into()));
        }
        if params.price <= Decimal::ZERO {
            return Err(CatalogError::ValidationError(format!(
                "price must be positive, got {}",
                params.price
            )));
        }
        Ok(Self {
            id,
            photo: params.photo,
            name: params.name,
            description: params.description,
            price: params.price,
            quantity: params.quantity,
        })
    }

    /// Handles stock actions. The check and the subtraction happen in one call,
    /// so concurrent decrements for the same product serialize in the actor.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, CatalogError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.quantity)),
            ProductAction::DecrementStock(amount) => {
                self.quantity = self.quantity.checked_sub(amount).ok_or(
                    CatalogError::InsufficientStock {
                        requested: amount,
                        available: self.quantity,
                    },
                )?;
                Ok(ProductActionResult::Updated(self.clone()))
            }
            ProductAction::Restock(amount) => {
                self.quantity = self.quantity.checked_add(amount).ok_or_else(|| {
                    CatalogError::ValidationError(format!("restocking {amount} overflows stock"))
                })?;
                Ok(ProductActionResult::Updated(self.clone()))
            }
        }
    }
}
