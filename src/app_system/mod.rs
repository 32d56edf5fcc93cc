//! System orchestration, startup, and shutdown logic.

mod shop_system;
mod tracing;

pub use self::shop_system::{spawn_stores, ShopSystem};
pub use self::tracing::setup_tracing;
