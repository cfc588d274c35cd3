use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use teloxide::{net::Download, prelude::*};

use ocb_core::docx;

use crate::router::AppState;

use super::reply::run_review;

static DOC_COUNTER: AtomicUsize = AtomicUsize::new(1);

const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        "document".to_string()
    } else {
        out
    }
}

fn uniquify_filename(name: &str, ts: u128, n: usize) -> String {
    let base = sanitize_filename(name);
    if let Some((stem, ext)) = base.rsplit_once('.') {
        if !stem.is_empty() && !ext.is_empty() {
            return format!("{stem}_{ts}_{n}.{ext}");
        }
    }
    format!("{base}_{ts}_{n}")
}

async fn download_document(
    bot: &Bot,
    state: &AppState,
    doc: &teloxide::types::Document,
) -> anyhow::Result<PathBuf> {
    let file = bot.get_file(doc.file.id.clone()).await?;

    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let n = DOC_COUNTER.fetch_add(1, Ordering::SeqCst);
    let file_name = doc
        .file_name
        .as_deref()
        .map(|s| uniquify_filename(s, ts, n))
        .unwrap_or_else(|| format!("doc_{ts}_{n}.docx"));

    let path = state.cfg.temp_dir.join(file_name);
    let mut dst = tokio::fs::File::create(&path).await?;
    bot.download_file(&file.path, &mut dst).await?;
    Ok(path)
}

pub async fn handle_document(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from().cloned() else {
        return Ok(());
    };
    let Some(doc) = msg.document() else {
        return Ok(());
    };

    let file_name = doc
        .file_name
        .clone()
        .unwrap_or_else(|| "document".to_string());

    // Extension gate comes before any download work.
    if !docx::is_docx(&file_name) {
        let _ = bot
            .send_message(
                msg.chat.id,
                "❌ Unsupported file type. Send the work as a .docx document.",
            )
            .await;
        return Ok(());
    }

    if doc.file.size as u64 > MAX_FILE_SIZE {
        let _ = bot
            .send_message(msg.chat.id, "❌ File too large. Maximum size is 10MB.")
            .await;
        return Ok(());
    }

    let path = match download_document(&bot, &state, doc).await {
        Ok(p) => p,
        Err(e) => {
            let _ = bot
                .send_message(
                    msg.chat.id,
                    format!(
                        "❌ Failed to download document: {}",
                        e.to_string().chars().take(100).collect::<String>()
                    ),
                )
                .await;
            return Ok(());
        }
    };

    // The archive is read synchronously; keep it off the async runtime.
    let extracted = tokio::task::spawn_blocking({
        let path = path.clone();
        move || docx::extract_text(&path)
    })
    .await;

    let result = match extracted {
        Ok(Ok(text)) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                let _ = bot
                    .send_message(msg.chat.id, "❌ The document contains no text.")
                    .await;
                Ok(())
            } else {
                run_review(&bot, &state, &msg, &user, &text).await
            }
        }
        Ok(Err(e)) => {
            let _ = bot
                .send_message(msg.chat.id, format!("❌ Failed to read the document: {e}"))
                .await;
            Ok(())
        }
        Err(_) => {
            let _ = bot
                .send_message(msg.chat.id, "❌ Failed to read the document.")
                .await;
            Ok(())
        }
    };

    // The transient file goes away no matter how the handling went.
    let _ = tokio::fs::remove_file(&path).await;

    result
}
