//! The secondary ("helper") bot used in bot mode.
//!
//! The Bot API has no call that adds a bot to a group, so inviting the helper
//! means checking, through the primary bot, that it is already present.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use tagall_delivery::{BotAccess, DeliveryError, Messenger};

use crate::messenger::BotMessenger;

pub struct HelperBot {
    primary: Bot,
    helper: Bot,
    helper_id: OnceCell<UserId>,
    messenger: Arc<BotMessenger>,
}

impl HelperBot {
    pub fn new(primary: Bot, helper: Bot) -> Self {
        let messenger = Arc::new(BotMessenger::new(helper.clone()));
        Self {
            primary,
            helper,
            helper_id: OnceCell::new(),
            messenger,
        }
    }

    async fn helper_id(&self) -> Result<UserId, teloxide::RequestError> {
        self.helper_id
            .get_or_try_init(|| async { self.helper.get_me().await.map(|me| me.user.id) })
            .await
            .copied()
    }
}

#[async_trait]
impl BotAccess for HelperBot {
    async fn invite(&self, chat_id: i64) -> Result<(), DeliveryError> {
        let helper_id = self
            .helper_id()
            .await
            .map_err(|e| DeliveryError::BotInvite(e.to_string()))?;
        let member = self
            .primary
            .get_chat_member(ChatId(chat_id), helper_id)
            .await
            .map_err(|e| DeliveryError::BotInvite(e.to_string()))?;
        if !member.kind.is_present() {
            return Err(DeliveryError::BotInvite(format!(
                "helper bot {helper_id} is not a member of chat {chat_id}"
            )));
        }
        debug!(chat_id, %helper_id, "tagall: helper bot present");
        Ok(())
    }

    async fn bind(&self) -> Result<(), DeliveryError> {
        let me = self
            .helper
            .get_me()
            .await
            .map_err(|e| DeliveryError::Session(e.to_string()))?;
        info!(username = me.username(), "tagall: helper bot session bound");
        Ok(())
    }

    fn messenger(&self) -> Arc<dyn Messenger> {
        self.messenger.clone()
    }
}
