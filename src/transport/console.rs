//! Line-oriented stand-in for a real chat transport, so the bot can be driven
//! from a terminal.
//!
//! Input lines look like `<user_id> <message>`, where `<message>` is plain
//! text, `photo:<ref>` for an uploaded photo or `cb:<payload>` for a button
//! press.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{InboundEvent, InlineKeyboard, Messenger, TextFormat, TransportError};
use crate::bot::Bot;
use crate::domain::{ChatId, MediaRef, UserId};

const PHOTO_PREFIX: &str = "photo:";
const CALLBACK_PREFIX: &str = "cb:";

pub struct ConsoleMessenger {
    stdout: Mutex<tokio::io::Stdout>,
}

impl Default for ConsoleMessenger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }

    async fn write(&self, chat: ChatId, body: &str, keyboard: Option<&InlineKeyboard>) -> Result<(), TransportError> {
        let mut out = format!("[chat {chat}] {body}\n");
        if let Some(keyboard) = keyboard {
            for payload in keyboard.payloads() {
                out.push_str(&format!("    [button] cb:{payload}\n"));
            }
        }
        let mut stdout = self.stdout.lock().await;
        stdout
            .write_all(out.as_bytes())
            .await
            .map_err(|e| TransportError::Delivery {
                chat,
                reason: e.to_string(),
            })?;
        stdout.flush().await.map_err(|e| TransportError::Delivery {
            chat,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        _format: TextFormat,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        self.write(chat, text, keyboard).await
    }

    async fn send_media(
        &self,
        chat: ChatId,
        media: &MediaRef,
        caption: &str,
        _format: TextFormat,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        self.write(chat, &format!("<photo {}>\n{caption}", media.as_str()), keyboard)
            .await
    }
}

pub fn parse_console_line(line: &str) -> Option<InboundEvent> {
    let (user, rest) = line.trim().split_once(char::is_whitespace)?;
    let user = UserId(user.parse().ok()?);
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }

    let event = if let Some(media) = rest.strip_prefix(PHOTO_PREFIX) {
        InboundEvent::Media {
            user,
            media: MediaRef::new(media.trim()),
        }
    } else if let Some(payload) = rest.strip_prefix(CALLBACK_PREFIX) {
        InboundEvent::Callback {
            user,
            payload: payload.trim().to_string(),
        }
    } else {
        InboundEvent::Text {
            user,
            text: rest.to_string(),
        }
    };
    Some(event)
}

/// Feeds stdin lines to `bot` until EOF or Ctrl-C.
pub async fn run_console(bot: &Bot) -> std::io::Result<()> {
    info!("Reading events from stdin as `<user_id> <message>`");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Stdin closed");
                    break;
                };
                match parse_console_line(&line) {
                    Some(event) => bot.handle(event).await,
                    None if line.trim().is_empty() => {}
                    None => warn!(line = %line, "Unrecognized console input"),
                }
            }
        }
    }
    Ok(())
}
