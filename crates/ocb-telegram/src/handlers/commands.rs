use teloxide::prelude::*;

const GREETING: &str = "Hi! I check submitted works for originality.\n\
Send the full text of the work as a regular message (or attach it as a .docx \
file); I will compare it against previously submitted works and archive it.";

const USAGE: &str = "/start — what this bot does\n\
/help — this message\n\n\
Send the work itself as a plain message or as a .docx attachment.";

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub async fn handle_command(bot: Bot, msg: Message) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let (cmd, _rest) = parse_command(text);

    let reply = match cmd.as_str() {
        "start" => GREETING,
        "help" => USAGE,
        _ => "Unknown command. See /help.",
    };

    let _ = bot.send_message(msg.chat.id, reply).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_strips_slash_and_bot_mention() {
        assert_eq!(parse_command("/start"), ("start".to_string(), String::new()));
        assert_eq!(
            parse_command("/Help@originality_bot trailing words"),
            ("help".to_string(), "trailing words".to_string())
        );
    }
}
