use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ParseMode, User},
};

use ocb_core::{
    domain::UserId,
    formatting::escape_html,
    review::{internet_flagged, RemoteOutcome, Review},
    Error,
};

use crate::router::AppState;

/// Run the pipeline for accepted text and report the verdict.
///
/// One acknowledgement is sent up front when a remote scan will run; the scan
/// then blocks this handler until the vendor finishes.
pub async fn run_review(
    bot: &Bot,
    state: &Arc<AppState>,
    msg: &Message,
    user: &User,
    text: &str,
) -> ResponseResult<()> {
    let submitter = UserId(user.id.0 as i64);
    let handle = user.username.clone();

    if state.review.has_scanner() {
        let _ = bot
            .send_message(msg.chat.id, "🔍 Checking the work, this can take a while...")
            .await;
    }

    match state.review.review(submitter, handle, text).await {
        Ok(review) => {
            let html = format_verdict(
                &review,
                state.cfg.similarity_threshold,
                state.cfg.internet_match_threshold,
            );
            let _ = bot
                .send_message(msg.chat.id, html)
                .parse_mode(ParseMode::Html)
                .await;
        }
        Err(Error::InvalidInput(_)) => {
            let _ = bot
                .send_message(msg.chat.id, "I can only check non-empty text.")
                .await;
        }
        Err(e) => {
            tracing::error!("review failed: {e}");
            let _ = bot
                .send_message(
                    msg.chat.id,
                    format!(
                        "❌ Failed to check the work: {}",
                        e.to_string().chars().take(200).collect::<String>()
                    ),
                )
                .await;
        }
    }

    Ok(())
}

/// Human verdict for one completed review.
pub(crate) fn format_verdict(review: &Review, local_threshold: f64, internet_threshold: f64) -> String {
    let mut out = String::new();

    match &review.local {
        Some(m) if m.ratio >= local_threshold => {
            out.push_str(&format!(
                "⚠ Similarity: {:.1}%\nClosest match is a work by @{}.\nIf you did not copy, just ignore this warning.",
                m.ratio * 100.0,
                escape_html(&m.handle)
            ));
        }
        _ => {
            out.push_str("✅ The work looks original (no close matches in the archive).");
        }
    }

    match &review.remote {
        RemoteOutcome::Skipped => {}
        RemoteOutcome::Scored(p) => {
            out.push('\n');
            if internet_flagged(*p, internet_threshold) {
                out.push_str(&format!(
                    "🌐 Internet match: {p:.1}% — matched content is above the allowed level."
                ));
            } else {
                out.push_str(&format!(
                    "🌐 Internet match: {p:.1}% — within the allowed level."
                ));
            }
        }
        RemoteOutcome::Failed(e) => {
            out.push('\n');
            out.push_str(&format!("❌ Internet check failed: {}", escape_html(e)));
        }
    }

    out.push_str("\n\nThe work has been archived.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocb_core::review::{DEFAULT_INTERNET_THRESHOLD, DEFAULT_SIMILARITY_THRESHOLD};
    use ocb_core::similarity::LocalMatch;

    fn review(local: Option<LocalMatch>, remote: RemoteOutcome) -> Review {
        Review {
            local,
            remote,
            submission_id: 1,
        }
    }

    #[test]
    fn warns_at_exactly_the_local_threshold() {
        let r = review(
            Some(LocalMatch {
                ratio: DEFAULT_SIMILARITY_THRESHOLD,
                submission_id: 7,
                handle: "alice".to_string(),
            }),
            RemoteOutcome::Skipped,
        );
        let text = format_verdict(&r, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_INTERNET_THRESHOLD);
        assert!(text.contains("Similarity: 70.0%"));
        assert!(text.contains("@alice"));
        assert!(!text.contains("Internet match"));
    }

    #[test]
    fn below_threshold_reads_as_original() {
        let r = review(
            Some(LocalMatch {
                ratio: 0.3,
                submission_id: 7,
                handle: "alice".to_string(),
            }),
            RemoteOutcome::Skipped,
        );
        let text = format_verdict(&r, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_INTERNET_THRESHOLD);
        assert!(text.contains("looks original"));
        assert!(text.contains("archived"));
    }

    #[test]
    fn internet_match_at_exactly_the_threshold_is_flagged() {
        let r = review(None, RemoteOutcome::Scored(20.0));
        let text = format_verdict(&r, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_INTERNET_THRESHOLD);
        assert!(text.contains("Internet match: 20.0%"));
        assert!(text.contains("above the allowed level"));
    }

    #[test]
    fn vendor_failure_is_reported_but_work_still_archived() {
        let r = review(
            None,
            RemoteOutcome::Failed("copyleaks scan failed: credits exhausted".to_string()),
        );
        let text = format_verdict(&r, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_INTERNET_THRESHOLD);
        assert!(text.contains("Internet check failed"));
        assert!(text.contains("credits exhausted"));
        assert!(text.contains("archived"));
    }
}
