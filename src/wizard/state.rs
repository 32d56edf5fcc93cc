//! The two wizards as data: an ordered field table per kind plus a final
//! confirmation step.

use crate::access::Role;
use crate::domain::ProductId;

/// One question asked by a wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Photo,
    Name,
    Description,
    Price,
    Quantity,
    FullName,
    Phone,
    Address,
    PaymentMethod,
}

const PRODUCT_FIELDS: &[Field] = &[
    Field::Photo,
    Field::Name,
    Field::Description,
    Field::Price,
    Field::Quantity,
];

const ORDER_FIELDS: &[Field] = &[
    Field::FullName,
    Field::Phone,
    Field::Address,
    Field::PaymentMethod,
];

impl Field {
    pub fn prompt(self) -> &'static str {
        match self {
            Field::Photo => "Send a photo of the product.",
            Field::Name => "Enter the product name.",
            Field::Description => "Enter the product description.",
            Field::Price => "Enter the price, e.g. 9.99.",
            Field::Quantity => "Enter the quantity in stock.",
            Field::FullName => "Enter your full name.",
            Field::Phone => "Enter your phone number.",
            Field::Address => "Enter the delivery address.",
            Field::PaymentMethod => "Enter the payment method (e.g. cash, card).",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Photo => "Photo",
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Price => "Price",
            Field::Quantity => "Quantity",
            Field::FullName => "Full name",
            Field::Phone => "Phone",
            Field::Address => "Address",
            Field::PaymentMethod => "Payment",
        }
    }
}

/// Which wizard a session is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardKind {
    /// Admin publishes a new product.
    Product,
    /// Customer orders the given product.
    Order { product_id: ProductId },
}

impl WizardKind {
    pub fn fields(&self) -> &'static [Field] {
        match self {
            WizardKind::Product => PRODUCT_FIELDS,
            WizardKind::Order { .. } => ORDER_FIELDS,
        }
    }

    pub fn required_role(&self) -> Role {
        match self {
            WizardKind::Product => Role::Admin,
            WizardKind::Order { .. } => Role::Customer,
        }
    }

    pub fn first_step(&self) -> Step {
        self.fields().first().map_or(Step::Confirm, |field| Step::Field(*field))
    }

    /// The step that follows `field` in this wizard's chain.
    pub fn next_step(&self, field: Field) -> Step {
        let fields = self.fields();
        fields
            .iter()
            .position(|f| *f == field)
            .and_then(|i| fields.get(i + 1))
            .map_or(Step::Confirm, |next| Step::Field(*next))
    }
}

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Field(Field),
    Confirm,
}

/// The answer given at the confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_chain_ends_in_confirm() {
        let kind = WizardKind::Product;
        let mut step = kind.first_step();
        let mut visited = Vec::new();
        while let Step::Field(field) = step {
            visited.push(field);
            step = kind.next_step(field);
        }
        assert_eq!(visited, PRODUCT_FIELDS);
        assert_eq!(step, Step::Confirm);
    }

    #[test]
    fn order_chain_starts_with_full_name() {
        let kind = WizardKind::Order {
            product_id: ProductId::new("product_1"),
        };
        assert_eq!(kind.first_step(), Step::Field(Field::FullName));
        assert_eq!(kind.next_step(Field::PaymentMethod), Step::Confirm);
        assert_eq!(kind.required_role(), Role::Customer);
    }
}
