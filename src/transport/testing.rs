//! Recording messenger for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{InlineKeyboard, Messenger, TextFormat, TransportError};
use crate::domain::{ChatId, MediaRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat: ChatId,
        text: String,
        format: TextFormat,
        keyboard: Option<InlineKeyboard>,
    },
    Media {
        chat: ChatId,
        media: MediaRef,
        caption: String,
        format: TextFormat,
        keyboard: Option<InlineKeyboard>,
    },
}

impl Sent {
    pub fn chat(&self) -> ChatId {
        match self {
            Sent::Text { chat, .. } | Sent::Media { chat, .. } => *chat,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Sent::Text { text, .. } => text,
            Sent::Media { caption, .. } => caption,
        }
    }

    pub fn keyboard(&self) -> Option<&InlineKeyboard> {
        match self {
            Sent::Text { keyboard, .. } | Sent::Media { keyboard, .. } => keyboard.as_ref(),
        }
    }
}

/// Records every successful send; the first `failures` attempts fail.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    failures: AtomicUsize,
    attempts: AtomicUsize,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat: ChatId) -> Vec<Sent> {
        self.sent().into_iter().filter(|sent| sent.chat() == chat).collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn record(&self, chat: ChatId, sent: Sent) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(TransportError::Delivery {
                chat,
                reason: "scripted failure".into(),
            });
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        format: TextFormat,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        self.record(
            chat,
            Sent::Text {
                chat,
                text: text.to_string(),
                format,
                keyboard: keyboard.cloned(),
            },
        )
    }

    async fn send_media(
        &self,
        chat: ChatId,
        media: &MediaRef,
        caption: &str,
        format: TextFormat,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        self.record(
            chat,
            Sent::Media {
                chat,
                media: media.clone(),
                caption: caption.to_string(),
                format,
                keyboard: keyboard.cloned(),
            },
        )
    }
}
