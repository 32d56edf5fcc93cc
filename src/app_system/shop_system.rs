use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::access::AccessGuard;
use crate::actor_framework::{prefixed_counter, ResourceActor};
use crate::bot::Bot;
use crate::clients::{CatalogClient, OrderClient};
use crate::config::AppConfig;
use crate::domain::{Order, OrderId, Product, ProductId};
use crate::notify::{Channels, NotificationService};
use crate::transport::Messenger;
use crate::wizard::{spawn_idle_sweeper, ConversationEngine};

/// Spawns the catalog and order store actors and returns their clients.
/// The actors stop once every client clone is dropped.
pub fn spawn_stores(buffer_size: usize) -> (CatalogClient, OrderClient, Vec<JoinHandle<()>>) {
    let next_product_id = prefixed_counter("product");
    let (product_actor, product_resource_client) =
        ResourceActor::<Product>::new("catalog", buffer_size, move || ProductId::new(next_product_id()));
    let catalog = CatalogClient::new(product_resource_client);
    let product_handle = tokio::spawn(product_actor.run());

    let next_order_id = prefixed_counter("order");
    let (order_actor, order_resource_client) =
        ResourceActor::<Order>::new("orders", buffer_size, move || OrderId::new(next_order_id()));
    let orders = OrderClient::new(order_resource_client, catalog.clone());
    let order_handle = tokio::spawn(order_actor.run());

    (catalog, orders, vec![product_handle, order_handle])
}

/// The running application: store actors, notification service, session
/// sweeper and the bot that ties them together.
pub struct ShopSystem {
    bot: Bot,
    shutdown: CancellationToken,
    sweeper: JoinHandle<()>,
    handles: Vec<JoinHandle<()>>,
}

impl ShopSystem {
    pub fn start(config: &AppConfig, messenger: Arc<dyn Messenger>) -> Self {
        info!(?config, "Starting shop system");

        let (catalog, orders, mut handles) = spawn_stores(32);

        let channels = Channels {
            orders: config.orders_channel,
            products: config.products_channel,
        };
        let (service, dispatcher) =
            NotificationService::new(config.notification_queue_capacity, messenger.clone(), channels);
        handles.push(tokio::spawn(service.run()));

        let engine = ConversationEngine::new(catalog, orders, config.session_idle_timeout);
        let shutdown = CancellationToken::new();
        let sweeper = spawn_idle_sweeper(engine.clone(), config.sweep_interval, shutdown.clone());

        let bot = Bot::new(engine, AccessGuard::new(config.admin_id), dispatcher, messenger);

        Self {
            bot,
            shutdown,
            sweeper,
            handles,
        }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Stops the sweeper, then drops every client so the actors and the
    /// notification service drain their queues and exit.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        self.shutdown.cancel();
        if let Err(e) = self.sweeper.await {
            error!("Sweeper task failed: {:?}", e);
        }

        drop(self.bot);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
