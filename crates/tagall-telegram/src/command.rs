//! Parsing of the commands understood by the adapter.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/tagall [text]`
    TagAll { text: Option<String> },
    /// `/tagall_settings`
    Settings,
}

/// Parse `text` as a command addressed to this bot.
///
/// Accepts `/cmd` and `/cmd@bot_username`; a command addressed to another bot
/// returns `None`. The argument is everything after the first whitespace,
/// trimmed, with inner line breaks kept.
pub fn parse_command(text: &str, bot_username: &str) -> Option<Command> {
    let text = text.trim_start();
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.find(char::is_whitespace) {
        Some(at) => (&rest[..at], rest[at..].trim()),
        None => (rest, ""),
    };
    let name = match head.split_once('@') {
        Some((name, target)) => {
            if !target.eq_ignore_ascii_case(bot_username) {
                return None;
            }
            name
        }
        None => head,
    };

    match name.to_ascii_lowercase().as_str() {
        "tagall" => Some(Command::TagAll {
            text: (!args.is_empty()).then(|| args.to_string()),
        }),
        "tagall_settings" => Some(Command::Settings),
        _ => None,
    }
}
