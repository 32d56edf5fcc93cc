//! The chat transport as seen from the bot: an outbound [`Messenger`] port and
//! the inbound events it delivers.

mod console;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChatId, MediaRef, UserId};

pub use console::{run_console, ConsoleMessenger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub text: String,
    /// Opaque callback payload echoed back in [`InboundEvent::Callback`].
    pub payload: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn single(text: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::default().row(vec![InlineButton {
            text: text.into(),
            payload: payload.into(),
        }])
    }

    pub fn row(mut self, buttons: Vec<InlineButton>) -> Self {
        self.rows.push(buttons);
        self
    }

    pub fn payloads(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|button| button.payload.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("delivery to chat {chat} failed: {reason}")]
    Delivery { chat: ChatId, reason: String },
}

/// Outbound half of the chat transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        format: TextFormat,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError>;

    async fn send_media(
        &self,
        chat: ChatId,
        media: &MediaRef,
        caption: &str,
        format: TextFormat,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError>;
}

/// Something a user did in a chat with the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Text { user: UserId, text: String },
    Media { user: UserId, media: MediaRef },
    Callback { user: UserId, payload: String },
}

impl InboundEvent {
    pub fn user(&self) -> UserId {
        match self {
            InboundEvent::Text { user, .. }
            | InboundEvent::Media { user, .. }
            | InboundEvent::Callback { user, .. } => *user,
        }
    }
}
