//! `/tagall_settings`: current delivery options with their descriptions.

use tagall_core::{DeliveryConfig, Strings};
use tagall_delivery::render::escape_html;

pub fn render_settings(strings: &Strings, config: &DeliveryConfig) -> String {
    let rows = [
        (
            "default_message",
            escape_html(&config.default_message),
            strings.doc_default_message,
        ),
        ("delete", config.delete.to_string(), strings.doc_delete),
        ("use_bot", config.use_bot.to_string(), strings.doc_use_bot),
        (
            "timeout",
            format!("{}", config.pause.as_secs_f64()),
            strings.doc_timeout,
        ),
        ("silent", config.silent.to_string(), strings.doc_silent),
        (
            "batch_size",
            config.batch_size.to_string(),
            strings.doc_batch_size,
        ),
    ];

    let mut out = String::from(strings.settings_header);
    for (name, value, doc) in rows {
        out.push_str(&format!("\n\n<b>{name}</b>: <code>{value}</code>\n<i>{doc}</i>"));
    }
    out
}
