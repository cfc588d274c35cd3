use std::sync::Arc;

use teloxide::prelude::*;

use crate::router::AppState;

use super::reply::run_review;

pub async fn handle_text(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text().map(|s| s.trim().to_string()) else {
        return Ok(());
    };

    if text.is_empty() {
        let _ = bot
            .send_message(msg.chat.id, "I can only check non-empty text.")
            .await;
        return Ok(());
    }

    let user = user.clone();
    run_review(&bot, &state, &msg, &user, &text).await
}
