use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::catalog::{CatalogError, ProductAction, ProductActionResult};
use crate::domain::{Product, ProductCreate, ProductId};

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(CatalogClient, Product, CatalogError, product);

impl CatalogClient {
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, CatalogError> {
        debug!("Sending request");
        let product = self.inner.create(params).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::StockLevel(level) => Ok(level),
            ProductActionResult::Updated(_) => Err(unexpected_result()),
        }
    }

    /// Atomically removes `amount` units and returns the updated product.
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: ProductId, amount: u32) -> Result<Product, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::DecrementStock(amount)).await {
            Ok(ProductActionResult::Updated(product)) => {
                info!(remaining = product.quantity, "Stock decremented");
                Ok(product)
            }
            Ok(ProductActionResult::StockLevel(_)) => Err(unexpected_result()),
            Err(e) => {
                warn!(error = %e, "Stock decrement rejected");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, amount: u32) -> Result<Product, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Restock(amount)).await? {
            ProductActionResult::Updated(product) => Ok(product),
            ProductActionResult::StockLevel(_) => Err(unexpected_result()),
        }
    }
}

fn unexpected_result() -> CatalogError {
    CatalogError::ActorCommunicationError("Unexpected result".to_string())
}
