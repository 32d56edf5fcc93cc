use tracing::{error, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clients::CatalogClient;
use crate::domain::{Order, OrderCreate, Product};
use crate::orders::OrderError;

/// An order together with the product state right after its unit was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,
    pub product: Product,
}

/// Client for interacting with the order actor.
///
/// Placing an order spans two actors: the catalog takes the unit, then the
/// order store records the order. A failed write hands the unit back.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    catalog: CatalogClient,
}

impl_get_method!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, catalog: CatalogClient) -> Self {
        Self { inner, catalog }
    }

    /// Takes one unit of the product and records the order.
    ///
    /// # Errors
    /// `InsufficientStock` when the last unit is already gone, `InvalidProduct`
    /// for an unknown product. Stock is restored if the order write fails.
    #[instrument(skip(self, params), fields(user_id = %params.user_id, product_id = %params.product_id))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<PlacedOrder, OrderError> {
        info!("Processing place_order request");
        let product_id = params.product_id.clone();

        // Step 1: take the unit (single check-and-subtract in the catalog actor)
        let product = self.catalog.decrement_stock(product_id.clone(), 1).await?;

        // Step 2: record the order, compensating on failure
        match self.inner.create(params).await {
            Ok(order) => {
                info!(order_id = %order.id, "Order created successfully");
                Ok(PlacedOrder { order, product })
            }
            Err(e) => {
                error!(error = %e, "Order creation failed, restoring stock");
                if let Err(restock_err) = self.catalog.restock(product_id, 1).await {
                    error!(error = %restock_err, "Stock restore failed");
                }
                Err(e)
            }
        }
    }
}
