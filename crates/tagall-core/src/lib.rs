pub mod config;
pub mod error;
pub mod strings;
pub mod types;

pub use config::{DeliveryConfig, TagAllOptions, TagallConfig, TelegramConfig};
pub use error::{CoreError, Result};
pub use strings::{Locale, Strings};
pub use types::{bot_chat_id, Batch, MemberId, MentionFragment, MessageRef, MENTION_GLYPH};
