//! The transient status message shown while tagging is in progress.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::token::CancellationToken;

/// An editable, deletable status message.
#[async_trait]
pub trait StatusHandle: Send + Sync {
    async fn edit(&self, html: &str) -> Result<(), DeliveryError>;

    async fn delete(&self) -> Result<(), DeliveryError>;
}

/// Creates status messages carrying a single cancel button.
#[async_trait]
pub trait StatusFactory: Send + Sync {
    /// Post `html` to `chat_id` with a button labelled `cancel_label`.
    ///
    /// Pressing the button must call [`CancellationToken::stop`] on `token`
    /// and acknowledge the press.
    async fn open(
        &self,
        chat_id: i64,
        html: &str,
        cancel_label: &str,
        token: CancellationToken,
    ) -> Result<Arc<dyn StatusHandle>, DeliveryError>;
}
