//! Telegram update handlers.
//!
//! Each handler validates its input, runs the review pipeline and reports the
//! verdict back to the chat. Handling is stateless: there is no session or
//! conversation memory across messages.

use std::sync::Arc;

use teloxide::prelude::*;

use crate::router::AppState;

mod commands;
mod document;
mod reply;
mod text;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if let Some(t) = msg.text() {
        if t.starts_with('/') {
            return commands::handle_command(bot, msg).await;
        }
        return text::handle_text(bot, msg, state).await;
    }

    if msg.document().is_some() {
        return document::handle_document(bot, msg, state).await;
    }

    let _ = bot
        .send_message(
            msg.chat.id,
            "Send the work as plain text, or attach it as a .docx file.",
        )
        .await;

    Ok(())
}
