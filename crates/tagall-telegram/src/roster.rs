//! Chat member enumeration for the Bot API.
//!
//! Bots cannot list the members of a group, so the roster remembers every
//! human seen in a chat (senders and new members) and forgets those who leave.
//! Enumeration yields the chat administrators first, then the roster, without
//! duplicates.

use std::collections::HashSet;
use std::sync::Arc;

use async_stream::stream;
use dashmap::DashMap;
use futures_util::stream::BoxStream;
use teloxide::prelude::*;
use tracing::debug;

use tagall_core::MemberId;
use tagall_delivery::{DeliveryError, MemberSource};

#[derive(Default)]
struct ChatRoster {
    order: Vec<u64>,
    seen: HashSet<u64>,
}

/// Members observed per chat, in first-seen order.
#[derive(Default)]
pub struct Roster {
    chats: DashMap<i64, ChatRoster>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, chat_id: i64, user_id: u64) {
        let mut chat = self.chats.entry(chat_id).or_default();
        if chat.seen.insert(user_id) {
            chat.order.push(user_id);
        }
    }

    pub fn forget(&self, chat_id: i64, user_id: u64) {
        if let Some(mut chat) = self.chats.get_mut(&chat_id) {
            if chat.seen.remove(&user_id) {
                chat.order.retain(|id| *id != user_id);
            }
        }
    }

    /// Snapshot of the members recorded for `chat_id`.
    pub fn members(&self, chat_id: i64) -> Vec<u64> {
        self.chats
            .get(&chat_id)
            .map(|chat| chat.order.clone())
            .unwrap_or_default()
    }

    /// Update the roster from an incoming group message.
    pub fn observe(&self, msg: &Message) {
        let chat_id = msg.chat.id.0;
        if let Some(from) = msg.from.as_ref().filter(|u| !u.is_bot) {
            self.record(chat_id, from.id.0);
        }
        if let Some(joined) = msg.new_chat_members() {
            for user in joined.iter().filter(|u| !u.is_bot) {
                self.record(chat_id, user.id.0);
            }
        }
        if let Some(left) = msg.left_chat_member() {
            self.forget(chat_id, left.id.0);
        }
    }
}

/// Merge administrators (in API order) with roster members, skipping repeats.
pub fn merge_members(admins: impl IntoIterator<Item = u64>, observed: Vec<u64>) -> Vec<u64> {
    let mut seen = HashSet::new();
    admins
        .into_iter()
        .chain(observed)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// [`MemberSource`] backed by `getChatAdministrators` and the [`Roster`].
pub struct ChatMembers {
    bot: Bot,
    roster: Arc<Roster>,
}

impl ChatMembers {
    pub fn new(bot: Bot, roster: Arc<Roster>) -> Self {
        Self { bot, roster }
    }
}

impl MemberSource for ChatMembers {
    fn members(&self, chat_id: i64) -> BoxStream<'static, Result<MemberId, DeliveryError>> {
        let bot = self.bot.clone();
        let roster = Arc::clone(&self.roster);
        Box::pin(stream! {
            let admins = match bot.get_chat_administrators(ChatId(chat_id)).await {
                Ok(admins) => admins,
                Err(e) => {
                    yield Err(DeliveryError::Members(e.to_string()));
                    return;
                }
            };
            let admin_ids = admins
                .into_iter()
                .filter(|m| !m.user.is_bot)
                .map(|m| m.user.id.0);
            let members = merge_members(admin_ids, roster.members(chat_id));
            debug!(chat_id, count = members.len(), "tagall: members enumerated");
            for id in members {
                yield Ok(MemberId(id));
            }
        })
    }
}
