#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::catalog::{CatalogError, ProductAction, ProductActionResult};
    use crate::clients::{CatalogClient, OrderClient};
    use crate::domain::{Order, OrderCreate, OrderId, Product, ProductId, UserId};
    use crate::mock_framework::{create_mock_client, expect_action, expect_create, expect_get};
    use crate::orders::OrderError;

    fn params() -> OrderCreate {
        OrderCreate {
            user_id: UserId(7),
            product_id: ProductId::new("product_1"),
            full_name: "Ivan Petrov".into(),
            phone: "+7 900 123-45-67".into(),
            address: "Lenina 1".into(),
            payment_method: "Cash".into(),
        }
    }

    fn mug(quantity: u32) -> Product {
        Product {
            id: ProductId::new("product_1"),
            photo: None,
            name: "Mug".into(),
            description: "Ceramic".into(),
            price: Decimal::new(999, 2),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_place_order_flow() {
        // 1. Setup Mocks
        let (product_client_inner, mut product_rx) = create_mock_client::<Product>(10);
        let (order_client_inner, mut order_rx) = create_mock_client::<Order>(10);
        let catalog = CatalogClient::new(product_client_inner);
        let order_client = OrderClient::new(order_client_inner, catalog);

        // 2. Place the order in background
        let order_task = tokio::spawn(async move { order_client.place_order(params()).await });

        // 3. Verify Interactions

        // Expect the stock decrement first
        let (product_id, action, responder) = expect_action(&mut product_rx)
            .await
            .expect("Expected Product Action");
        assert_eq!(product_id, ProductId::new("product_1"));
        assert!(matches!(action, ProductAction::DecrementStock(1)));
        responder.send(Ok(ProductActionResult::Updated(mug(4)))).unwrap();

        // Then the order write
        let (payload, responder) = expect_create(&mut order_rx)
            .await
            .expect("Expected Order Create");
        assert_eq!(payload.user_id, UserId(7));
        assert_eq!(payload.product_id, ProductId::new("product_1"));
        let order = Order {
            id: OrderId::new("order_1"),
            user_id: payload.user_id,
            product_id: payload.product_id,
            full_name: payload.full_name,
            phone: payload.phone,
            address: payload.address,
            payment_method: payload.payment_method,
            created_at: Utc::now(),
        };
        responder.send(Ok(order.clone())).unwrap();

        // 4. Verify Result
        let placed = order_task.await.unwrap().unwrap();
        assert_eq!(placed.order, order);
        assert_eq!(placed.product.quantity, 4);
    }

    #[tokio::test]
    async fn test_sold_out_never_reaches_order_store() {
        let (product_client_inner, mut product_rx) = create_mock_client::<Product>(10);
        let (order_client_inner, mut order_rx) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(order_client_inner, CatalogClient::new(product_client_inner));

        let order_task = tokio::spawn(async move { order_client.place_order(params()).await });

        let (_, _, responder) = expect_action(&mut product_rx).await.expect("Expected Product Action");
        responder
            .send(Err(CatalogError::InsufficientStock {
                requested: 1,
                available: 0,
            }))
            .unwrap();

        let result = order_task.await.unwrap();
        assert_eq!(
            result,
            Err(OrderError::InsufficientStock {
                requested: 1,
                available: 0
            })
        );
        // The task finished and dropped its client without a Create.
        assert!(order_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_order_write_restores_stock() {
        let (product_client_inner, mut product_rx) = create_mock_client::<Product>(10);
        let (order_client_inner, mut order_rx) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(order_client_inner, CatalogClient::new(product_client_inner));

        let order_task = tokio::spawn(async move { order_client.place_order(params()).await });

        let (_, _, responder) = expect_action(&mut product_rx).await.expect("Expected decrement");
        responder.send(Ok(ProductActionResult::Updated(mug(0)))).unwrap();

        let (_, responder) = expect_create(&mut order_rx).await.expect("Expected Order Create");
        responder
            .send(Err(OrderError::ValidationError("address must not be empty".into())))
            .unwrap();

        let (product_id, action, responder) = expect_action(&mut product_rx)
            .await
            .expect("Expected compensating restock");
        assert_eq!(product_id, ProductId::new("product_1"));
        assert!(matches!(action, ProductAction::Restock(1)));
        responder.send(Ok(ProductActionResult::Updated(mug(1)))).unwrap();

        let result = order_task.await.unwrap();
        assert!(matches!(result, Err(OrderError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_get_order_reads_order_store() {
        let (product_client_inner, _product_rx) = create_mock_client::<Product>(10);
        let (order_client_inner, mut order_rx) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(order_client_inner, CatalogClient::new(product_client_inner));

        let lookup = tokio::spawn(async move { order_client.get_order(OrderId::new("order_9")).await });

        let (id, responder) = expect_get(&mut order_rx).await.expect("Expected Order Get");
        assert_eq!(id, OrderId::new("order_9"));
        responder.send(Ok(None)).unwrap();

        assert_eq!(lookup.await.unwrap(), Ok(None));
    }
}
