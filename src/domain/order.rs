use chrono::{DateTime, Utc};

use super::{OrderId, ProductId, UserId};

/// Represents a customer order. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a new order. ID and timestamp are stamped by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
}
