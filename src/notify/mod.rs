//! Notification dispatcher: completed orders and published products are
//! queued here after their store write and delivered to the configured
//! channels by a dedicated task.

pub mod format;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{ChatId, MediaRef, Order, Product};
use crate::transport::{InlineKeyboard, Messenger, TextFormat, TransportError};

use self::format::{order_notification, product_card};

/// A committed store mutation worth announcing.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    OrderPlaced { order: Order, product_name: String },
    ProductPublished(Product),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    pub orders: ChatId,
    pub products: ChatId,
}

/// Producer handle. Cloned into whoever completes wizards.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<NotificationEvent>,
}

impl NotificationDispatcher {
    /// Queues `event`. Waits only for queue space, never for delivery; a
    /// stopped service is logged and otherwise ignored.
    #[instrument(skip(self, event))]
    pub async fn dispatch(&self, event: NotificationEvent) {
        debug!("Queueing notification");
        if let Err(e) = self.sender.send(event).await {
            error!(event = ?e.0, "Notification service stopped, event dropped");
        }
    }
}

/// One outbound message, kept whole so it can be retried.
#[derive(Debug, Clone)]
enum Delivery {
    Text {
        chat: ChatId,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Media {
        chat: ChatId,
        photo: MediaRef,
        caption: String,
        keyboard: InlineKeyboard,
    },
}

/// Consumer task draining the notification queue.
pub struct NotificationService {
    receiver: mpsc::Receiver<NotificationEvent>,
    messenger: Arc<dyn Messenger>,
    channels: Channels,
}

impl NotificationService {
    pub fn new(
        capacity: usize,
        messenger: Arc<dyn Messenger>,
        channels: Channels,
    ) -> (Self, NotificationDispatcher) {
        let (sender, receiver) = mpsc::channel(capacity);
        let service = Self {
            receiver,
            messenger,
            channels,
        };
        (service, NotificationDispatcher { sender })
    }

    #[instrument(name = "notification_service", skip(self))]
    pub async fn run(mut self) {
        info!("NotificationService starting");
        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event).await;
        }
        info!("NotificationService stopped");
    }

    async fn handle_event(&self, event: NotificationEvent) -> bool {
        let delivery = match event {
            NotificationEvent::OrderPlaced {
                order,
                product_name,
            } => {
                debug!(order_id = %order.id, "Formatting order notification");
                Delivery::Text {
                    chat: self.channels.orders,
                    text: order_notification(&order, &product_name),
                    keyboard: None,
                }
            }
            NotificationEvent::ProductPublished(product) => {
                debug!(product_id = %product.id, "Formatting product card");
                let card = product_card(&product);
                match card.photo {
                    Some(photo) => Delivery::Media {
                        chat: self.channels.products,
                        photo,
                        caption: card.caption,
                        keyboard: card.keyboard,
                    },
                    None => Delivery::Text {
                        chat: self.channels.products,
                        text: card.caption,
                        keyboard: Some(card.keyboard),
                    },
                }
            }
        };
        self.deliver_with_retry(&delivery).await
    }

    /// Sends once and retries a failure exactly once.
    async fn deliver_with_retry(&self, delivery: &Delivery) -> bool {
        match self.send(delivery).await {
            Ok(()) => return true,
            Err(e) => warn!(error = %e, "Notification delivery failed, retrying once"),
        }
        match self.send(delivery).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Notification delivery failed after retry");
                false
            }
        }
    }

    async fn send(&self, delivery: &Delivery) -> Result<(), TransportError> {
        match delivery {
            Delivery::Text {
                chat,
                text,
                keyboard,
            } => {
                self.messenger
                    .send_text(*chat, text, TextFormat::Html, keyboard.as_ref())
                    .await
            }
            Delivery::Media {
                chat,
                photo,
                caption,
                keyboard,
            } => {
                self.messenger
                    .send_media(*chat, photo, caption, TextFormat::Html, Some(keyboard))
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderId, ProductId, UserId};
    use crate::transport::testing::{RecordingMessenger, Sent};
    use chrono::Utc;
    use rust_decimal::Decimal;

    const CHANNELS: Channels = Channels {
        orders: ChatId(-100),
        products: ChatId(-200),
    };

    fn order() -> Order {
        Order {
            id: OrderId::new("order_1"),
            user_id: UserId(9),
            product_id: ProductId::new("product_1"),
            full_name: "Ivan Petrov".into(),
            phone: "+7 900 123-45-67".into(),
            address: "Lenina 1".into(),
            payment_method: "Cash".into(),
            created_at: Utc::now(),
        }
    }

    fn product(photo: Option<&str>) -> Product {
        Product {
            id: ProductId::new("product_1"),
            photo: photo.map(MediaRef::new),
            name: "Mug".into(),
            description: "Ceramic".into(),
            price: Decimal::new(999, 2),
            quantity: 3,
        }
    }

    fn service(messenger: Arc<RecordingMessenger>) -> NotificationService {
        NotificationService::new(4, messenger, CHANNELS).0
    }

    #[tokio::test]
    async fn order_goes_to_orders_channel_as_html() {
        let messenger = Arc::new(RecordingMessenger::new());
        let service = service(messenger.clone());

        let delivered = service
            .handle_event(NotificationEvent::OrderPlaced {
                order: order(),
                product_name: "Mug".into(),
            })
            .await;

        assert!(delivered);
        let sent = messenger.sent_to(CHANNELS.orders);
        assert_eq!(sent.len(), 1);
        assert!(matches!(&sent[0], Sent::Text { format: TextFormat::Html, .. }));
        assert!(sent[0].body().starts_with("<b>New order #order_1</b>"));
    }

    #[tokio::test]
    async fn product_with_photo_is_posted_as_media() {
        let messenger = Arc::new(RecordingMessenger::new());
        let service = service(messenger.clone());

        service
            .handle_event(NotificationEvent::ProductPublished(product(Some("P"))))
            .await;

        let sent = messenger.sent_to(CHANNELS.products);
        assert_eq!(sent.len(), 1);
        assert!(matches!(
            &sent[0],
            Sent::Media { media, format: TextFormat::Html, .. } if media.as_str() == "P"
        ));
        assert!(sent[0].keyboard().is_some());
    }

    #[tokio::test]
    async fn product_without_photo_is_posted_as_text() {
        let messenger = Arc::new(RecordingMessenger::new());
        let service = service(messenger.clone());

        service
            .handle_event(NotificationEvent::ProductPublished(product(None)))
            .await;

        let sent = messenger.sent_to(CHANNELS.products);
        assert!(matches!(
            &sent[..],
            [Sent::Text { format: TextFormat::Html, keyboard: Some(_), .. }]
        ));
    }

    #[tokio::test]
    async fn failed_delivery_is_retried_once() {
        let messenger = Arc::new(RecordingMessenger::failing(1));
        let service = service(messenger.clone());

        let delivered = service
            .handle_event(NotificationEvent::ProductPublished(product(None)))
            .await;

        assert!(delivered);
        assert_eq!(messenger.attempts(), 2);
        assert_eq!(messenger.sent().len(), 1);
    }

    #[tokio::test]
    async fn delivery_gives_up_after_second_failure() {
        let messenger = Arc::new(RecordingMessenger::failing(5));
        let service = service(messenger.clone());

        let delivered = service
            .handle_event(NotificationEvent::OrderPlaced {
                order: order(),
                product_name: "Mug".into(),
            })
            .await;

        assert!(!delivered);
        assert_eq!(messenger.attempts(), 2);
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn dispatcher_feeds_running_service() {
        let messenger = Arc::new(RecordingMessenger::new());
        let (service, dispatcher) = NotificationService::new(4, messenger.clone(), CHANNELS);
        let handle = tokio::spawn(service.run());

        dispatcher
            .dispatch(NotificationEvent::ProductPublished(product(Some("P"))))
            .await;
        drop(dispatcher);
        handle.await.unwrap();

        assert_eq!(messenger.sent().len(), 1);
    }
}
