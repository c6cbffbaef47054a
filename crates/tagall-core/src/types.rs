use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-width display glyph (soft hyphen) used as mention text and as the
/// separator between mentions inside one batch message.
pub const MENTION_GLYPH: char = '\u{ad}';

/// Telegram user id of a chat member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Pre-rendered HTML mention of a single member.
///
/// The visible text is [`MENTION_GLYPH`], so a batch of mentions renders as
/// (almost) nothing while still notifying every member it links to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MentionFragment(String);

impl MentionFragment {
    pub fn for_member(member: MemberId) -> Self {
        Self(format!(
            "<a href=\"tg://user?id={}\">{}</a>",
            member.0, MENTION_GLYPH
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MentionFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered group of mentions delivered together in one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch(Vec<MentionFragment>);

impl Batch {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fragments(&self) -> &[MentionFragment] {
        &self.0
    }

    pub fn into_fragments(self) -> Vec<MentionFragment> {
        self.0
    }
}

impl From<Vec<MentionFragment>> for Batch {
    fn from(fragments: Vec<MentionFragment>) -> Self {
        Self(fragments)
    }
}

/// Address of a message that was sent (or received) in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

impl MessageRef {
    pub fn new(chat_id: i64, message_id: i32) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

/// Map a chat id to the supergroup form the bot identity addresses.
///
/// Bare (positive) channel ids become `-100{id}`; ids that are already in the
/// Bot API's negative form are returned unchanged.
pub fn bot_chat_id(chat_id: i64) -> i64 {
    if chat_id < 0 {
        return chat_id;
    }
    format!("-100{chat_id}").parse().unwrap_or(chat_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_links_member_with_glyph() {
        let f = MentionFragment::for_member(MemberId(42));
        assert_eq!(f.as_str(), "<a href=\"tg://user?id=42\">\u{ad}</a>");
    }

    #[test]
    fn bot_chat_id_prefixes_bare_ids() {
        assert_eq!(bot_chat_id(1234567890), -1001234567890);
        assert_eq!(bot_chat_id(1), -1001);
    }

    #[test]
    fn bot_chat_id_keeps_bot_api_ids() {
        assert_eq!(bot_chat_id(-1001234567890), -1001234567890);
        assert_eq!(bot_chat_id(-4242), -4242);
    }

    #[test]
    fn bot_chat_id_overflow_falls_back() {
        assert_eq!(bot_chat_id(i64::MAX), i64::MAX);
    }

    #[test]
    fn batch_exposes_fragments_in_order() {
        let batch = Batch::from(vec![
            MentionFragment::for_member(MemberId(1)),
            MentionFragment::for_member(MemberId(2)),
        ]);
        assert_eq!(batch.len(), 2);
        assert!(batch.fragments()[0].as_str().contains("id=1"));
        assert!(batch.fragments()[1].as_str().contains("id=2"));
    }
}
