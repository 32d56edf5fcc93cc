//! Callback payload strings carried by inline buttons.

use crate::domain::ProductId;
use crate::wizard::Decision;

pub const ORDER_PREFIX: &str = "order:"; // followed by product id
pub const CONFIRM_ACCEPT: &str = "confirm:yes";
pub const CONFIRM_REJECT: &str = "confirm:no";
pub const CANCEL: &str = "cancel";

/// A decoded button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Order(ProductId),
    Confirm(Decision),
    Cancel,
}

pub fn order_payload(product_id: &ProductId) -> String {
    format!("{ORDER_PREFIX}{}", product_id.as_str())
}

pub fn parse_callback(payload: &str) -> Option<CallbackAction> {
    match payload {
        CONFIRM_ACCEPT => Some(CallbackAction::Confirm(Decision::Accept)),
        CONFIRM_REJECT => Some(CallbackAction::Confirm(Decision::Reject)),
        CANCEL => Some(CallbackAction::Cancel),
        _ => payload
            .strip_prefix(ORDER_PREFIX)
            .filter(|id| !id.is_empty())
            .map(|id| CallbackAction::Order(ProductId::new(id))),
    }
}
