//! `Messenger` implementation over a teloxide `Bot`.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};

use tagall_core::MessageRef;
use tagall_delivery::{DeliveryError, Messenger};

/// Sends and deletes HTML messages as one bot account.
#[derive(Clone)]
pub struct BotMessenger {
    bot: Bot,
}

impl BotMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for BotMessenger {
    async fn send_message(&self, chat_id: i64, html: &str) -> Result<MessageRef, DeliveryError> {
        let sent = self
            .bot
            .send_message(ChatId(chat_id), html)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| DeliveryError::Send(e.to_string()))?;
        Ok(MessageRef::new(sent.chat.id.0, sent.id.0))
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), DeliveryError> {
        self.bot
            .delete_message(ChatId(message.chat_id), MessageId(message.message_id))
            .await
            .map_err(|e| DeliveryError::Delete(e.to_string()))?;
        Ok(())
    }
}
