//! Localized user-facing strings.
//!
//! Every locale carries a complete table; there is no per-key fallback.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::Ru => &RU,
        }
    }
}

/// String table for one locale. HTML-formatted where Telegram renders HTML.
#[derive(Debug)]
pub struct Strings {
    pub bot_error: &'static str,
    pub gathering: &'static str,
    pub cancel: &'static str,
    pub cancelled: &'static str,
    pub settings_header: &'static str,
    pub doc_default_message: &'static str,
    pub doc_delete: &'static str,
    pub doc_use_bot: &'static str,
    pub doc_timeout: &'static str,
    pub doc_silent: &'static str,
    pub doc_batch_size: &'static str,
}

static EN: Strings = Strings {
    bot_error: "🚫 <b>Unable to invite inline bot to chat</b>",
    gathering: "🧚‍♀️ <b>Calling participants of this chat...</b>",
    cancel: "🚫 Cancel",
    cancelled: "🧚‍♀️ <b>TagAll cancelled!</b>",
    settings_header: "⚙️ <b>TagAll settings</b>",
    doc_default_message: "Default message of mentions",
    doc_delete: "Delete messages after tagging",
    doc_use_bot: "Use inline bot to tag people",
    doc_timeout: "What time interval to sleep between each tag message",
    doc_silent: "Do not send message with cancel button",
    doc_batch_size: "How many people to mention in one message",
};

static RU: Strings = Strings {
    bot_error: "🚫 <b>Не получилось пригласить бота в чат</b>",
    gathering: "🧚‍♀️ <b>Отмечаю участников чата...</b>",
    cancel: "🚫 Отмена",
    cancelled: "🧚‍♀️ <b>Сбор участников отменен!</b>",
    settings_header: "⚙️ <b>Настройки TagAll</b>",
    doc_default_message: "Сообщение по умолчанию для тегов",
    doc_delete: "Удалять сообщения после тега",
    doc_use_bot: "Использовать бота для тегов",
    doc_timeout: "Время между сообщениями с тегами",
    doc_silent: "Не отправлять сообщение с кнопкой отмены",
    doc_batch_size: "Сколько участников отмечать в одном сообщении",
};
