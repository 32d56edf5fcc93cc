use chrono::Utc;

use super::error::OrderError;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderId};

impl Entity for Order {
    type Id = OrderId;
    type CreateParams = OrderCreate;
    type Action = (); // Orders are immutable
    type ActionResult = ();
    type Error = OrderError;

    /// Creates a new Order and stamps `created_at`.
    ///
    /// # Errors
    /// `ValidationError` if any customer-supplied field is blank.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        let required = [
            ("full_name", &params.full_name),
            ("phone", &params.phone),
            ("address", &params.address),
            ("payment_method", &params.payment_method),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(OrderError::ValidationError(format!("{field} must not be empty")));
        }

        Ok(Self {
            id,
            user_id: params.user_id,
            product_id: params.product_id,
            full_name: params.full_name,
            phone: params.phone,
            address: params.address,
            payment_method: params.payment_method,
            created_at: Utc::now(),
        })
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), OrderError> {
        Err(OrderError::ValidationError(format!("order {} is immutable", self.id)))
    }
}
