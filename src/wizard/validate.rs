//! Per-field validators. Pure and synchronous; a rejection carries the reason
//! shown to the user.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::state::Field;
use crate::domain::MediaRef;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;
const MAX_PRICE_SCALE: u32 = 2;

static PHONE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9(][0-9 ()\-]*[0-9]$").expect("phone pattern is a valid regex")
});

/// What the user sent in reply to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Media(MediaRef),
}

/// A value that passed its field's validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Media(MediaRef),
    Price(Decimal),
    Quantity(u32),
}

pub fn validate(field: Field, input: &Input) -> Result<FieldValue, String> {
    match (field, input) {
        (Field::Photo, Input::Media(media)) => Ok(FieldValue::Media(media.clone())),
        (Field::Photo, Input::Text(_)) => Err("Please send a photo of the product".into()),
        (_, Input::Media(_)) => Err(format!("{} must be sent as text", field.label())),
        (Field::Price, Input::Text(text)) => parse_price(text).map(FieldValue::Price),
        (Field::Quantity, Input::Text(text)) => parse_quantity(text).map(FieldValue::Quantity),
        (Field::Phone, Input::Text(text)) => parse_phone(text).map(FieldValue::Text),
        (
            Field::Name | Field::Description | Field::FullName | Field::Address | Field::PaymentMethod,
            Input::Text(text),
        ) => non_empty(field, text).map(FieldValue::Text),
    }
}

fn non_empty(field: Field, text: &str) -> Result<String, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(format!("{} must not be empty", field.label()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Accepts `9.99` and `9,99`. The result always carries two decimal places.
fn parse_price(text: &str) -> Result<Decimal, String> {
    let normalized = text.trim().replace(',', ".");
    match Decimal::from_str(&normalized) {
        Ok(price) if price <= Decimal::ZERO => Err("Price must be greater than zero".into()),
        Ok(price) if price.normalize().scale() > MAX_PRICE_SCALE => {
            Err("Price can have at most two decimal places".into())
        }
        Ok(mut price) => {
            price.rescale(MAX_PRICE_SCALE);
            Ok(price)
        }
        Err(_) => Err("Price must be a number, e.g. 9.99".into()),
    }
}

fn parse_quantity(text: &str) -> Result<u32, String> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| "Quantity must be a whole number, zero or more".to_string())
}

fn parse_phone(text: &str) -> Result<String, String> {
    let trimmed = text.trim();
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if PHONE_SHAPE.is_match(trimmed) && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        Ok(trimmed.to_string())
    } else {
        Err("Phone must look like +7 900 123-45-67".into())
    }
}
