//! Telegram adapter.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event loop
//! until the process exits.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::info;

use tagall_core::{DeliveryConfig, TagallConfig, TelegramConfig};
use tagall_delivery::TagAll;

use crate::error::TelegramError;
use crate::handler::{handle_callback, handle_message};
use crate::helper::HelperBot;
use crate::messenger::BotMessenger;
use crate::roster::{ChatMembers, Roster};
use crate::status::{CancelRegistry, InlineForms};

/// Shared state handed to every handler.
pub struct TagallState {
    pub config: TelegramConfig,
    pub tagall: TagAll,
    pub registry: Arc<CancelRegistry>,
    pub roster: Arc<Roster>,
    pub bot_username: String,
}

pub struct TelegramAdapter {
    config: TagallConfig,
    delivery: DeliveryConfig,
}

impl TelegramAdapter {
    /// Validate the configuration; nothing is contacted yet.
    pub fn new(config: &TagallConfig) -> Result<Self, TelegramError> {
        if config.telegram.bot_token.trim().is_empty() {
            return Err(TelegramError::NoToken);
        }
        let delivery = config.delivery()?;
        Ok(Self {
            config: config.clone(),
            delivery,
        })
    }

    /// Connect to Telegram and drive the long-polling loop.
    ///
    /// Runs for the lifetime of the process.
    pub async fn run(self) -> Result<(), TelegramError> {
        let bot = Bot::new(&self.config.telegram.bot_token);
        let me = bot.get_me().await?;
        let bot_username = me.username().to_string();

        let registry = Arc::new(CancelRegistry::new());
        let roster = Arc::new(Roster::new());

        let mut tagall = TagAll::new(
            self.delivery,
            self.config.locale.strings(),
            Arc::new(BotMessenger::new(bot.clone())),
            Arc::new(ChatMembers::new(bot.clone(), Arc::clone(&roster))),
            Arc::new(InlineForms::new(bot.clone(), Arc::clone(&registry))),
        );
        if let Some(token) = &self.config.telegram.helper_bot_token {
            tagall = tagall.with_bot(Arc::new(HelperBot::new(bot.clone(), Bot::new(token))));
        }

        let state = Arc::new(TagallState {
            config: self.config.telegram.clone(),
            tagall,
            registry,
            roster,
            bot_username: bot_username.clone(),
        });

        info!(bot = %bot_username, "Telegram: starting long-polling dispatcher");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handle_message))
            .branch(Update::filter_callback_query().endpoint(handle_callback));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![state])
            .default_handler(|_upd| async {})
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
