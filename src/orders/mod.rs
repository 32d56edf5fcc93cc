//! Order store: immutable orders stamped at creation.

pub mod entity;
pub mod error;

pub use error::*;
