use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::catalog::CatalogError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<CatalogError> for OrderError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => OrderError::InvalidProduct(id),
            CatalogError::InsufficientStock {
                requested,
                available,
            } => OrderError::InsufficientStock {
                requested,
                available,
            },
            CatalogError::ValidationError(msg) => OrderError::ValidationError(msg),
            CatalogError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
        }
    }
}
