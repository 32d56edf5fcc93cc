//! Conversation engine: one guided wizard per user, driven through an
//! explicit step table until it is confirmed, cancelled or times out.

mod engine;
mod error;
mod session;
mod state;
mod validate;

pub use engine::{spawn_idle_sweeper, Completion, ConversationEngine};
pub use error::WizardError;
pub use session::Prompt;
pub use state::{Decision, Field, Step, WizardKind};
pub use validate::Input;
