//! Update handlers registered in the teloxide Dispatcher.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, info, warn};

use tagall_core::MessageRef;
use tagall_delivery::{CancellationToken, TagRequest};

use crate::adapter::TagallState;
use crate::allow;
use crate::command::{parse_command, Command};
use crate::settings::render_settings;
use crate::status::parse_cancel_data;

/// Message handler.
///
/// Runs for every incoming `Message`. Performs:
/// 1. Roster update for group chats
/// 2. Command parsing (`/tagall`, `/tagall_settings`)
/// 3. Permission check
/// 4. Non-blocking tagging run
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<TagallState>) -> ResponseResult<()> {
    let in_group = msg.chat.is_group() || msg.chat.is_supergroup();
    if !in_group {
        return Ok(());
    }

    // 1. Remember who is in the chat.
    state.roster.observe(&msg);

    // 2. Commands only.
    let Some(command) = msg
        .text()
        .and_then(|text| parse_command(text, &state.bot_username))
    else {
        return Ok(());
    };

    // 3. Permission check (deny-by-default).
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if from.is_bot || !allow::may_tag(&bot, &state.config, msg.chat.id, from).await {
        debug!(chat_id = msg.chat.id.0, user_id = from.id.0, "tagall: command refused");
        return Ok(());
    }

    match command {
        Command::Settings => {
            let text = render_settings(state.tagall.strings(), state.tagall.config());
            bot.send_message(msg.chat.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::TagAll { text } => {
            // 4. Run in a separate task so the dispatcher keeps serving
            //    callbacks (the cancel button) while tagging.
            let request = TagRequest {
                chat_id: msg.chat.id.0,
                text,
                command: Some(MessageRef::new(msg.chat.id.0, msg.id.0)),
            };
            info!(chat_id = request.chat_id, user_id = from.id.0, "tagall: run requested");
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                let chat_id = request.chat_id;
                if let Err(e) = state.tagall.execute(request, CancellationToken::new()).await {
                    warn!(chat_id, code = e.code(), error = %e, "tagall: run failed");
                }
            });
        }
    }

    Ok(())
}

/// Callback handler for the cancel button on status messages.
pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<TagallState>) -> ResponseResult<()> {
    let Some(key) = q.data.as_deref().and_then(parse_cancel_data) else {
        return Ok(());
    };

    let Some(entry) = state.registry.get(key) else {
        // Run already finished; just clear the spinner.
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    if !allow::may_tag(&bot, &state.config, ChatId(entry.chat_id), &q.from).await {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    entry.token.stop();
    info!(chat_id = entry.chat_id, user_id = q.from.id.0, "tagall: cancel pressed");
    bot.answer_callback_query(q.id.clone())
        .text(state.tagall.strings().cancel)
        .await?;
    Ok(())
}
