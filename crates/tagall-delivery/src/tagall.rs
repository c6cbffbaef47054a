//! One `/tagall` invocation from request to report.

use std::sync::Arc;

use futures_util::TryStreamExt;
use tracing::{debug, info, warn};

use tagall_core::{bot_chat_id, DeliveryConfig, MentionFragment, MessageRef, Strings};

use crate::batch::batches;
use crate::delivery::{DeliveryLoop, DeliveryReport};
use crate::error::DeliveryError;
use crate::identity::{BotAccess, Identity, Messenger};
use crate::members::MemberSource;
use crate::status::StatusFactory;
use crate::token::CancellationToken;

/// A request to tag every member of a chat.
#[derive(Debug, Clone)]
pub struct TagRequest {
    pub chat_id: i64,
    /// Text placed before the mentions; the configured default when `None` or blank.
    pub text: Option<String>,
    /// The command message that triggered the request, removed before tagging.
    pub command: Option<MessageRef>,
}

/// Tagging service wired to its collaborators.
pub struct TagAll {
    config: DeliveryConfig,
    strings: &'static Strings,
    direct: Arc<dyn Messenger>,
    bot: Option<Arc<dyn BotAccess>>,
    members: Arc<dyn MemberSource>,
    status: Arc<dyn StatusFactory>,
}

impl TagAll {
    pub fn new(
        config: DeliveryConfig,
        strings: &'static Strings,
        direct: Arc<dyn Messenger>,
        members: Arc<dyn MemberSource>,
        status: Arc<dyn StatusFactory>,
    ) -> Self {
        Self {
            config,
            strings,
            direct,
            bot: None,
            members,
            status,
        }
    }

    /// Attach the secondary bot identity used when `use_bot` is set.
    pub fn with_bot(mut self, bot: Arc<dyn BotAccess>) -> Self {
        self.bot = Some(bot);
        self
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    pub fn strings(&self) -> &'static Strings {
        self.strings
    }

    /// Run one invocation.
    ///
    /// A failed bot invitation is reported to the chat and yields an
    /// [`Outcome::Aborted`](crate::Outcome::Aborted) report; every other
    /// error is returned to the caller.
    pub async fn execute(
        &self,
        request: TagRequest,
        token: CancellationToken,
    ) -> Result<DeliveryReport, DeliveryError> {
        let chat_id = request.chat_id;
        match self.run(request, token).await {
            Err(DeliveryError::BotInvite(reason)) => {
                warn!(chat_id, %reason, "tagall: bot invitation failed");
                self.direct.send_message(chat_id, self.strings.bot_error).await?;
                Ok(DeliveryReport::aborted())
            }
            other => other,
        }
    }

    async fn run(
        &self,
        request: TagRequest,
        token: CancellationToken,
    ) -> Result<DeliveryReport, DeliveryError> {
        let chat_id = request.chat_id;

        if let Some(command) = request.command {
            if let Err(e) = self.direct.delete_message(command).await {
                debug!(chat_id, error = %e, "tagall: could not delete command message");
            }
        }

        let (identity, destination) = self.resolve_identity(chat_id).await?;

        let status = if self.config.silent {
            None
        } else {
            Some(
                self.status
                    .open(chat_id, self.strings.gathering, self.strings.cancel, token.clone())
                    .await?,
            )
        };

        let text = request
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.config.default_message.clone());

        info!(
            chat_id,
            destination,
            identity = identity.label(),
            silent = self.config.silent,
            "tagall: starting delivery"
        );

        let fragments = self
            .members
            .members(chat_id)
            .map_ok(MentionFragment::for_member);

        DeliveryLoop {
            config: self.config.clone(),
            identity,
            chat_id: destination,
            text,
            status,
            token,
            strings: self.strings,
        }
        .run(batches(fragments, self.config.batch_size))
        .await
    }

    /// Pick the sending identity and the chat id it addresses.
    async fn resolve_identity(&self, chat_id: i64) -> Result<(Identity, i64), DeliveryError> {
        if !self.config.use_bot {
            return Ok((Identity::Direct(Arc::clone(&self.direct)), chat_id));
        }

        let bot = self
            .bot
            .as_ref()
            .ok_or_else(|| DeliveryError::BotInvite("no bot identity configured".to_string()))?;

        bot.invite(chat_id).await.map_err(|e| match e {
            DeliveryError::BotInvite(reason) => DeliveryError::BotInvite(reason),
            other => DeliveryError::BotInvite(other.to_string()),
        })?;

        if let Err(e) = bot.bind().await {
            debug!(chat_id, error = %e, "tagall: bot session binding ignored");
        }

        Ok((Identity::Bot(bot.messenger()), bot_chat_id(chat_id)))
    }
}
