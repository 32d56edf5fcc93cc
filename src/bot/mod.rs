//! Routes inbound chat events to the conversation engine and turns its
//! results into replies and channel notifications.

mod commands;
pub mod ids;

use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use crate::access::AccessGuard;
use crate::domain::{ChatId, ProductId, UserId};
use crate::notify::{NotificationDispatcher, NotificationEvent};
use crate::transport::{InboundEvent, InlineButton, InlineKeyboard, Messenger, TextFormat};
use crate::wizard::{Completion, ConversationEngine, Decision, Input, Prompt, WizardError, WizardKind};

use self::commands::{Command, HELP_TEXT};
use self::ids::{parse_callback, CallbackAction, CANCEL, CONFIRM_ACCEPT, CONFIRM_REJECT};

const GREETING: &str = "Hi! The bot is running ✅";

/// Entry point for every inbound event.
#[derive(Clone)]
pub struct Bot {
    engine: ConversationEngine,
    guard: AccessGuard,
    dispatcher: NotificationDispatcher,
    messenger: Arc<dyn Messenger>,
}

impl Bot {
    pub fn new(
        engine: ConversationEngine,
        guard: AccessGuard,
        dispatcher: NotificationDispatcher,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            engine,
            guard,
            dispatcher,
            messenger,
        }
    }

    /// Handles one event. Every failure ends in exactly one reply to the user.
    #[instrument(skip(self, event), fields(user_id = %event.user()))]
    pub async fn handle(&self, event: InboundEvent) {
        let user_id = event.user();
        if let Err(e) = self.route(event).await {
            if e.is_internal() {
                error!(error = %e, "Event handling failed");
            } else {
                debug!(error = %e, "Event rejected");
            }
            self.reply(user_id, &e.user_message(), None).await;
        }
    }

    async fn route(&self, event: InboundEvent) -> Result<(), WizardError> {
        match event {
            InboundEvent::Text { user, text } => match text.parse::<Command>() {
                Ok(command) => self.on_command(user, command).await,
                Err(()) => self.on_input(user, Input::Text(text)).await,
            },
            InboundEvent::Media { user, media } => self.on_input(user, Input::Media(media)).await,
            InboundEvent::Callback { user, payload } => match parse_callback(&payload) {
                Some(CallbackAction::Order(product_id)) => self.start_order(user, product_id).await,
                Some(CallbackAction::Confirm(decision)) => self.on_confirm(user, decision).await,
                Some(CallbackAction::Cancel) => self.on_cancel(user).await,
                None => {
                    warn!(%payload, "Unknown callback payload");
                    self.reply(user, "This button is no longer valid.", None).await;
                    Ok(())
                }
            },
        }
    }

    async fn on_command(&self, user_id: UserId, command: Command) -> Result<(), WizardError> {
        debug!(?command, "Command received");
        match command {
            Command::Start => {
                self.reply(user_id, GREETING, None).await;
                Ok(())
            }
            Command::Help => {
                self.reply(user_id, HELP_TEXT, None).await;
                Ok(())
            }
            Command::AddProduct => self.start_wizard(user_id, WizardKind::Product).await,
            Command::Cancel => self.on_cancel(user_id).await,
            Command::Unknown => {
                self.reply(user_id, "Unknown command. Send /help for the list.", None)
                    .await;
                Ok(())
            }
        }
    }

    async fn start_order(&self, user_id: UserId, product_id: ProductId) -> Result<(), WizardError> {
        self.start_wizard(user_id, WizardKind::Order { product_id }).await
    }

    async fn start_wizard(&self, user_id: UserId, kind: WizardKind) -> Result<(), WizardError> {
        self.guard.require(user_id, kind.required_role())?;
        let prompt = self.engine.start(user_id, kind).await?;
        self.send_prompt(user_id, &prompt).await;
        Ok(())
    }

    async fn on_input(&self, user_id: UserId, input: Input) -> Result<(), WizardError> {
        let prompt = self.engine.advance(user_id, input).await?;
        self.send_prompt(user_id, &prompt).await;
        Ok(())
    }

    async fn on_confirm(&self, user_id: UserId, decision: Decision) -> Result<(), WizardError> {
        match self.engine.confirm(user_id, decision).await? {
            Completion::Published(product) => {
                self.reply(user_id, &format!("Product \"{}\" published.", product.name), None)
                    .await;
                self.dispatcher
                    .dispatch(NotificationEvent::ProductPublished(product))
                    .await;
            }
            Completion::Submitted(placed) => {
                self.reply(
                    user_id,
                    &format!("Thank you! Order #{} has been placed.", placed.order.id),
                    None,
                )
                .await;
                self.dispatcher
                    .dispatch(NotificationEvent::OrderPlaced {
                        order: placed.order,
                        product_name: placed.product.name,
                    })
                    .await;
            }
            Completion::Cancelled => self.reply(user_id, "Cancelled.", None).await,
        }
        Ok(())
    }

    async fn on_cancel(&self, user_id: UserId) -> Result<(), WizardError> {
        let text = if self.engine.cancel(user_id).await {
            "Cancelled."
        } else {
            "Nothing to cancel."
        };
        self.reply(user_id, text, None).await;
        Ok(())
    }

    async fn send_prompt(&self, user_id: UserId, prompt: &Prompt) {
        let keyboard = if prompt.is_confirmation() {
            confirm_keyboard()
        } else {
            InlineKeyboard::single("Cancel", CANCEL)
        };
        self.reply(user_id, &prompt.text, Some(&keyboard)).await;
    }

    /// Replies in the user's private chat. Transport failures are logged only.
    async fn reply(&self, user_id: UserId, text: &str, keyboard: Option<&InlineKeyboard>) {
        let chat = ChatId::from(user_id);
        if let Err(e) = self
            .messenger
            .send_text(chat, text, TextFormat::Plain, keyboard)
            .await
        {
            warn!(%chat, error = %e, "Reply failed");
        }
    }
}

fn confirm_keyboard() -> InlineKeyboard {
    InlineKeyboard::default().row(vec![
        InlineButton {
            text: "Confirm".into(),
            payload: CONFIRM_ACCEPT.into(),
        },
        InlineButton {
            text: "Cancel".into(),
            payload: CONFIRM_REJECT.into(),
        },
    ])
}
