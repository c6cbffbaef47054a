//! Messaging identities: the direct client and the secondary bot.

use std::sync::Arc;

use async_trait::async_trait;

use tagall_core::MessageRef;

use crate::error::DeliveryError;

/// Send/delete capability shared by every messaging identity.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `html` to `chat_id` and return the address of the new message.
    async fn send_message(&self, chat_id: i64, html: &str) -> Result<MessageRef, DeliveryError>;

    async fn delete_message(&self, message: MessageRef) -> Result<(), DeliveryError>;
}

/// Access to the secondary bot identity used in bot mode.
#[async_trait]
pub trait BotAccess: Send + Sync {
    /// Make the bot a member of `chat_id`.
    async fn invite(&self, chat_id: i64) -> Result<(), DeliveryError>;

    /// Bind the bot session for the current invocation.
    async fn bind(&self) -> Result<(), DeliveryError>;

    fn messenger(&self) -> Arc<dyn Messenger>;
}

/// The identity batch messages are sent from, chosen once per invocation.
#[derive(Clone)]
pub enum Identity {
    Direct(Arc<dyn Messenger>),
    Bot(Arc<dyn Messenger>),
}

impl Identity {
    pub fn label(&self) -> &'static str {
        match self {
            Identity::Direct(_) => "direct",
            Identity::Bot(_) => "bot",
        }
    }

    fn messenger(&self) -> &dyn Messenger {
        match self {
            Identity::Direct(m) | Identity::Bot(m) => m.as_ref(),
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[async_trait]
impl Messenger for Identity {
    async fn send_message(&self, chat_id: i64, html: &str) -> Result<MessageRef, DeliveryError> {
        self.messenger().send_message(chat_id, html).await
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), DeliveryError> {
        self.messenger().delete_message(message).await
    }
}
