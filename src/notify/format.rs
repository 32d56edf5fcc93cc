//! Payload formatting for the orders and products channels.

use crate::bot::ids::order_payload;
use crate::domain::{MediaRef, Order, Product};
use crate::transport::InlineKeyboard;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Escapes the three characters HTML parse mode treats specially.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Rich-text order notification for the orders channel.
pub fn order_notification(order: &Order, product_name: &str) -> String {
    format!(
        "<b>New order #{id}</b>\n\
         Product: {product}\n\
         Full name: {full_name}\n\
         Phone: {phone}\n\
         Address: {address}\n\
         Payment: {payment}\n\
         Customer: @{customer}\n\
         Time: {time}",
        id = escape_html(order.id.as_str()),
        product = escape_html(product_name),
        full_name = escape_html(&order.full_name),
        phone = escape_html(&order.phone),
        address = escape_html(&order.address),
        payment = escape_html(&order.payment_method),
        customer = order.user_id,
        time = order.created_at.format(TIMESTAMP_FORMAT),
    )
}

/// Publication post for the products channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub photo: Option<MediaRef>,
    pub caption: String,
    pub keyboard: InlineKeyboard,
}

pub fn product_card(product: &Product) -> ProductCard {
    let caption = format!(
        "<b>{name}</b>\n{description}\nPrice: {price}\nIn stock: {quantity}",
        name = escape_html(&product.name),
        description = escape_html(&product.description),
        price = product.price,
        quantity = product.quantity,
    );
    ProductCard {
        photo: product.photo.clone(),
        caption,
        keyboard: InlineKeyboard::single("Order", order_payload(&product.id)),
    }
}
