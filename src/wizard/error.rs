use thiserror::Error;

use crate::catalog::CatalogError;
use crate::orders::OrderError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WizardError {
    #[error("user is not allowed to start this wizard")]
    Unauthorized,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a wizard is already running for this user")]
    SessionConflict,
    #[error("no active wizard for this user")]
    NoActiveSession,
    #[error("product is out of stock")]
    InsufficientStock,
    #[error("product not found")]
    ProductNotFound,
    #[error("store invariant violated: {0}")]
    ValidationError(String),
    #[error("store unavailable: {0}")]
    Store(String),
}

impl WizardError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            WizardError::Unauthorized => "You are not allowed to add products.".to_string(),
            WizardError::InvalidInput(reason) => format!("{reason}. Please try again."),
            WizardError::SessionConflict => {
                "You already have a form in progress. Finish it or send /cancel first.".to_string()
            }
            WizardError::NoActiveSession => {
                "There is nothing to continue. Pick a product or send /start.".to_string()
            }
            WizardError::InsufficientStock => "Sorry, this product is out of stock.".to_string(),
            WizardError::ProductNotFound => "Sorry, this product is no longer available.".to_string(),
            WizardError::ValidationError(_) | WizardError::Store(_) => {
                "Something went wrong on our side. Please try again later.".to_string()
            }
        }
    }

    /// Internal failures that deserve an `error!` rather than a `warn!`.
    pub fn is_internal(&self) -> bool {
        matches!(self, WizardError::ValidationError(_) | WizardError::Store(_))
    }
}

impl From<CatalogError> for WizardError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => WizardError::ProductNotFound,
            CatalogError::InsufficientStock { .. } => WizardError::InsufficientStock,
            CatalogError::ValidationError(msg) => WizardError::ValidationError(msg),
            CatalogError::ActorCommunicationError(msg) => WizardError::Store(msg),
        }
    }
}

impl From<OrderError> for WizardError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::InvalidProduct(_) => WizardError::ProductNotFound,
            OrderError::InsufficientStock { .. } => WizardError::InsufficientStock,
            OrderError::ValidationError(msg) => WizardError::ValidationError(msg),
            OrderError::NotFound(msg) | OrderError::ActorCommunicationError(msg) => {
                WizardError::Store(msg)
            }
        }
    }
}
