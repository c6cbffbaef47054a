use futures_util::stream::BoxStream;

use tagall_core::MemberId;

use crate::error::DeliveryError;

/// Lazy enumeration of the members of a chat.
pub trait MemberSource: Send + Sync {
    /// Stream the members of `chat_id`. The stream is finite and consumed once.
    fn members(&self, chat_id: i64) -> BoxStream<'static, Result<MemberId, DeliveryError>>;
}
