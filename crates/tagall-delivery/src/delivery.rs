//! The per-invocation delivery loop.
//!
//! For every batch: render, send, optionally delete, arm the watcher, pause,
//! disarm, then stop if the token tripped. The status message is deleted once
//! when the loop ends, whatever the outcome.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tracing::{debug, info, warn};

use tagall_core::{Batch, DeliveryConfig, Strings};

use crate::error::DeliveryError;
use crate::identity::{Identity, Messenger};
use crate::render::render_batch;
use crate::status::StatusHandle;
use crate::token::CancellationToken;
use crate::watcher::CancellationWatcher;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Every batch was sent.
    #[default]
    Completed,
    /// The token tripped; remaining batches were skipped.
    Cancelled,
    /// The invocation never started sending (bot invitation failed).
    Aborted,
}

/// Summary of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub outcome: Outcome,
    pub batches_sent: usize,
    pub members_tagged: usize,
    pub messages_deleted: usize,
}

impl DeliveryReport {
    pub fn aborted() -> Self {
        Self {
            outcome: Outcome::Aborted,
            ..Default::default()
        }
    }
}

pub struct DeliveryLoop {
    pub config: DeliveryConfig,
    pub identity: Identity,
    /// Destination chat, already mapped for the chosen identity.
    pub chat_id: i64,
    /// Message text placed before the mentions (not yet escaped).
    pub text: String,
    pub status: Option<Arc<dyn StatusHandle>>,
    pub token: CancellationToken,
    pub strings: &'static Strings,
}

impl DeliveryLoop {
    /// Deliver every batch of `batches`, then delete the status message.
    pub async fn run<S>(self, batches: S) -> Result<DeliveryReport, DeliveryError>
    where
        S: Stream<Item = Result<Batch, DeliveryError>>,
    {
        let result = self.drive(batches).await;

        if let Some(status) = &self.status {
            if let Err(e) = status.delete().await {
                warn!(chat_id = self.chat_id, error = %e, "tagall: failed to delete status message");
            }
        }

        match &result {
            Ok(report) => info!(
                chat_id = self.chat_id,
                identity = self.identity.label(),
                outcome = ?report.outcome,
                batches = report.batches_sent,
                members = report.members_tagged,
                deleted = report.messages_deleted,
                "tagall: delivery finished"
            ),
            Err(e) => warn!(
                chat_id = self.chat_id,
                code = e.code(),
                error = %e,
                "tagall: delivery failed"
            ),
        }
        result
    }

    async fn drive<S>(&self, batches: S) -> Result<DeliveryReport, DeliveryError>
    where
        S: Stream<Item = Result<Batch, DeliveryError>>,
    {
        let mut batches = std::pin::pin!(batches);
        let mut report = DeliveryReport::default();
        let mut reported = false;

        while let Some(batch) = batches.next().await {
            let batch = batch?;
            let html = render_batch(&self.text, &batch);
            let sent = self.identity.send_message(self.chat_id, &html).await?;
            report.batches_sent += 1;
            report.members_tagged += batch.len();
            debug!(
                chat_id = self.chat_id,
                batch = report.batches_sent,
                size = batch.len(),
                message_id = sent.message_id,
                "tagall: batch sent"
            );

            if self.config.delete {
                match self.identity.delete_message(sent).await {
                    Ok(()) => report.messages_deleted += 1,
                    Err(e) => debug!(message_id = sent.message_id, error = %e, "tagall: delete ignored"),
                }
            }

            let watcher = self.status.as_ref().map(|status| {
                CancellationWatcher::arm(
                    self.token.clone(),
                    Arc::clone(status),
                    self.strings.cancelled.to_string(),
                )
            });
            tokio::time::sleep(self.config.pause).await;
            if let Some(watcher) = watcher {
                reported |= watcher.disarm().await;
            }

            if !self.token.is_active() {
                // Tripped after the watcher was aborted, or no watcher was armed.
                if let (Some(status), false) = (&self.status, reported) {
                    if let Err(e) = status.edit(self.strings.cancelled).await {
                        warn!(error = %e, "tagall: failed to show cancellation on status message");
                    }
                }
                report.outcome = Outcome::Cancelled;
                return Ok(report);
            }
        }

        report.outcome = Outcome::Completed;
        Ok(report)
    }
}
