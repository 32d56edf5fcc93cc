pub mod ids;
pub mod order;
pub mod product;

pub use ids::*;
pub use order::*;
pub use product::*;
