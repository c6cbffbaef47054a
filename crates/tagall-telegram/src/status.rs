//! Status message with an inline cancel button.
//!
//! Every open status message registers its run's token under a random key;
//! the key travels in the button's callback data and the callback handler
//! looks it up to stop the run.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use uuid::Uuid;

use tagall_core::MessageRef;
use tagall_delivery::{CancellationToken, DeliveryError, StatusFactory, StatusHandle};

const CANCEL_PREFIX: &str = "tagall:cancel:";

/// Build the callback data carried by a cancel button.
pub fn cancel_data(key: &str) -> String {
    format!("{CANCEL_PREFIX}{key}")
}

/// Extract the registry key from cancel-button callback data.
pub fn parse_cancel_data(data: &str) -> Option<&str> {
    data.strip_prefix(CANCEL_PREFIX).filter(|key| !key.is_empty())
}

/// A run that can still be cancelled from its status message.
#[derive(Debug, Clone)]
pub struct CancelEntry {
    pub chat_id: i64,
    pub token: CancellationToken,
}

/// Cancel-button key → running invocation.
#[derive(Default)]
pub struct CancelRegistry {
    entries: DashMap<String, CancelEntry>,
}

impl CancelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` and return its freshly generated key.
    pub fn register(&self, chat_id: i64, token: CancellationToken) -> String {
        let key = Uuid::new_v4().simple().to_string();
        self.entries
            .insert(key.clone(), CancelEntry { chat_id, token });
        key
    }

    pub fn get(&self, key: &str) -> Option<CancelEntry> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Posts status messages from the primary bot.
pub struct InlineForms {
    bot: Bot,
    registry: Arc<CancelRegistry>,
}

impl InlineForms {
    pub fn new(bot: Bot, registry: Arc<CancelRegistry>) -> Self {
        Self { bot, registry }
    }
}

#[async_trait]
impl StatusFactory for InlineForms {
    async fn open(
        &self,
        chat_id: i64,
        html: &str,
        cancel_label: &str,
        token: CancellationToken,
    ) -> Result<Arc<dyn StatusHandle>, DeliveryError> {
        let key = self.registry.register(chat_id, token);
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            cancel_label.to_string(),
            cancel_data(&key),
        )]]);

        let sent = self
            .bot
            .send_message(ChatId(chat_id), html)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await;

        match sent {
            Ok(msg) => Ok(Arc::new(InlineStatus {
                bot: self.bot.clone(),
                message: MessageRef::new(msg.chat.id.0, msg.id.0),
                key,
                registry: Arc::clone(&self.registry),
            })),
            Err(e) => {
                self.registry.remove(&key);
                Err(DeliveryError::Status(e.to_string()))
            }
        }
    }
}

/// A posted status message.
pub struct InlineStatus {
    bot: Bot,
    message: MessageRef,
    key: String,
    registry: Arc<CancelRegistry>,
}

#[async_trait]
impl StatusHandle for InlineStatus {
    /// Replace the text; the cancel button goes away with the old markup.
    async fn edit(&self, html: &str) -> Result<(), DeliveryError> {
        self.bot
            .edit_message_text(
                ChatId(self.message.chat_id),
                MessageId(self.message.message_id),
                html,
            )
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| DeliveryError::Status(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self) -> Result<(), DeliveryError> {
        self.registry.remove(&self.key);
        self.bot
            .delete_message(
                ChatId(self.message.chat_id),
                MessageId(self.message.message_id),
            )
            .await
            .map_err(|e| DeliveryError::Status(e.to_string()))?;
        Ok(())
    }
}
