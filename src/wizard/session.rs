use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::Instant;

use super::error::WizardError;
use super::state::{Field, Step, WizardKind};
use super::validate::{validate, FieldValue, Input};
use crate::domain::{MediaRef, OrderCreate, ProductCreate, UserId};

/// Values collected so far. Only ever holds validator output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedFields {
    values: BTreeMap<Field, FieldValue>,
}

impl CollectedFields {
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    fn insert(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    fn text(&self, field: Field) -> Result<String, WizardError> {
        match self.values.get(&field) {
            Some(FieldValue::Text(text)) => Ok(text.clone()),
            _ => Err(missing(field)),
        }
    }

    fn media(&self, field: Field) -> Option<MediaRef> {
        match self.values.get(&field) {
            Some(FieldValue::Media(media)) => Some(media.clone()),
            _ => None,
        }
    }

    fn price(&self) -> Result<Decimal, WizardError> {
        match self.values.get(&Field::Price) {
            Some(FieldValue::Price(price)) => Ok(*price),
            _ => Err(missing(Field::Price)),
        }
    }

    fn quantity(&self) -> Result<u32, WizardError> {
        match self.values.get(&Field::Quantity) {
            Some(FieldValue::Quantity(quantity)) => Ok(*quantity),
            _ => Err(missing(Field::Quantity)),
        }
    }

    pub fn to_product_params(&self) -> Result<ProductCreate, WizardError> {
        Ok(ProductCreate {
            photo: self.media(Field::Photo),
            name: self.text(Field::Name)?,
            description: self.text(Field::Description)?,
            price: self.price()?,
            quantity: self.quantity()?,
        })
    }

    pub fn to_order_params(&self, user_id: UserId, kind: &WizardKind) -> Result<OrderCreate, WizardError> {
        let WizardKind::Order { product_id } = kind else {
            return Err(WizardError::ValidationError("not an order wizard".into()));
        };
        Ok(OrderCreate {
            user_id,
            product_id: product_id.clone(),
            full_name: self.text(Field::FullName)?,
            phone: self.text(Field::Phone)?,
            address: self.text(Field::Address)?,
            payment_method: self.text(Field::PaymentMethod)?,
        })
    }
}

fn missing(field: Field) -> WizardError {
    WizardError::ValidationError(format!("{} was never collected", field.label()))
}

/// What to show the user next.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub step: Step,
    pub text: String,
}

impl Prompt {
    pub fn is_confirmation(&self) -> bool {
        self.step == Step::Confirm
    }
}

/// One user's wizard in progress.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: UserId,
    kind: WizardKind,
    step: Step,
    collected: CollectedFields,
    started_at: Instant,
    last_activity: Instant,
}

impl Session {
    pub fn new(user_id: UserId, kind: WizardKind, now: Instant) -> Self {
        Self {
            user_id,
            step: kind.first_step(),
            kind,
            collected: CollectedFields::default(),
            started_at: now,
            last_activity: now,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn kind(&self) -> &WizardKind {
        &self.kind
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn collected(&self) -> &CollectedFields {
        &self.collected
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_activity) >= timeout
    }

    /// Validates `input` against the current field and advances on success.
    /// On failure nothing changes and the reason is returned.
    pub fn apply(&mut self, input: &Input) -> Result<Step, WizardError> {
        let Step::Field(field) = self.step else {
            return Err(WizardError::InvalidInput(
                "Please confirm or cancel using the buttons".into(),
            ));
        };
        let value = validate(field, input).map_err(WizardError::InvalidInput)?;
        self.collected.insert(field, value);
        self.step = self.kind.next_step(field);
        Ok(self.step)
    }

    pub fn prompt(&self) -> Prompt {
        let text = match self.step {
            Step::Field(field) => field.prompt().to_string(),
            Step::Confirm => self.summary(),
        };
        Prompt {
            step: self.step,
            text,
        }
    }

    /// Confirmation text listing every collected value in chain order.
    pub fn summary(&self) -> String {
        let title = match self.kind {
            WizardKind::Product => "Publish this product?",
            WizardKind::Order { .. } => "Place this order?",
        };
        let mut text = format!("{title}\n");
        for field in self.kind.fields() {
            let value = match self.collected.get(*field) {
                Some(FieldValue::Text(text)) => text.clone(),
                Some(FieldValue::Media(_)) => "attached".to_string(),
                Some(FieldValue::Price(price)) => price.to_string(),
                Some(FieldValue::Quantity(quantity)) => quantity.to_string(),
                None => "-".to_string(),
            };
            let _ = write!(text, "\n{}: {}", field.label(), value);
        }
        text
    }
}
