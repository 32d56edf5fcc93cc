//! Catalog store: products and their stock counters.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
