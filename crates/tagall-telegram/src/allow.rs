//! Who may start (and cancel) a tagging run.
//!
//! Deny-by-default: an empty `allow_users` list admits nobody unless
//! `allow_admins` lets the chat's administrators through.

use teloxide::prelude::*;
use teloxide::types::User;
use tracing::debug;

use tagall_core::TelegramConfig;

/// Returns `true` when `allow_users` names the user.
///
/// Entries are `"*"`, a numeric user id, or a username with or without the
/// leading `@`. Usernames compare case-insensitively, as Telegram treats them.
pub fn is_listed(allow_users: &[String], username: Option<&str>, user_id: u64) -> bool {
    let id = user_id.to_string();
    allow_users.iter().any(|entry| {
        let entry = entry.trim();
        if entry == "*" || entry == id {
            return true;
        }
        match (entry.strip_prefix('@').unwrap_or(entry), username) {
            (name, Some(username)) if !name.is_empty() => name.eq_ignore_ascii_case(username),
            _ => false,
        }
    })
}

/// Full permission check: the allowlist, then chat administrators if enabled.
pub async fn may_tag(bot: &Bot, config: &TelegramConfig, chat_id: ChatId, user: &User) -> bool {
    if is_listed(&config.allow_users, user.username.as_deref(), user.id.0) {
        return true;
    }
    if !config.allow_admins {
        return false;
    }
    match bot.get_chat_member(chat_id, user.id).await {
        Ok(member) => member.kind.is_privileged(),
        Err(e) => {
            debug!(chat_id = chat_id.0, user_id = user.id.0, error = %e, "tagall: admin lookup failed");
            false
        }
    }
}
