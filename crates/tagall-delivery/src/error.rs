use thiserror::Error;

/// Errors produced while running a tagging invocation.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("bot invitation failed: {0}")]
    BotInvite(String),

    #[error("bot session binding failed: {0}")]
    Session(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("member enumeration failed: {0}")]
    Members(String),

    #[error("status message failed: {0}")]
    Status(String),

    #[error(transparent)]
    Config(#[from] tagall_core::CoreError),
}

impl DeliveryError {
    /// Short error code string used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            DeliveryError::BotInvite(_) => "BOT_INVITE_FAILED",
            DeliveryError::Session(_) => "SESSION_FAILED",
            DeliveryError::Send(_) => "SEND_FAILED",
            DeliveryError::Delete(_) => "DELETE_FAILED",
            DeliveryError::Members(_) => "MEMBERS_FAILED",
            DeliveryError::Status(_) => "STATUS_FAILED",
            DeliveryError::Config(e) => e.code(),
        }
    }
}
