//! Rendering of one batch into the HTML text of a tag message.

use tagall_core::{Batch, MENTION_GLYPH};

/// Escape `&`, `<`, `>` and `"` for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped `text` followed by every mention of `batch`, joined by the mention glyph.
pub fn render_batch(text: &str, batch: &Batch) -> String {
    let mut out = escape_html(text);
    for (i, fragment) in batch.fragments().iter().enumerate() {
        if i > 0 {
            out.push(MENTION_GLYPH);
        }
        out.push_str(fragment.as_str());
    }
    out
}
