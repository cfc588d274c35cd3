//! The review pipeline: local scoring, optional remote scan, one archive
//! write per accepted submission.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{NewSubmission, UserId};
use crate::ports::RemoteScanner;
use crate::similarity::{best_match, LocalMatch};
use crate::store::SubmissionStore;
use crate::{errors::Error, Result};

/// Local-similarity warning threshold (inclusive).
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
/// Internet-match warning threshold in percent (inclusive).
pub const DEFAULT_INTERNET_THRESHOLD: f64 = 20.0;

/// What the remote scan contributed to a review.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteOutcome {
    /// No scanner configured: local-only deployment.
    Skipped,
    /// Vendor-reported matched-content percentage.
    Scored(f64),
    /// The vendor call failed; the message is shown to the user.
    Failed(String),
}

/// Result of one completed review, ready for the chat adapter to format.
#[derive(Clone, Debug)]
pub struct Review {
    pub local: Option<LocalMatch>,
    pub remote: RemoteOutcome,
    /// Id of the archived submission.
    pub submission_id: i64,
}

impl Review {
    /// `true` when the best local match reaches `threshold` (inclusive).
    pub fn local_flagged(&self, threshold: f64) -> bool {
        self.local
            .as_ref()
            .map(|m| m.ratio >= threshold)
            .unwrap_or(false)
    }
}

/// `true` when a vendor percentage counts as an internet match (inclusive,
/// mirroring the local threshold comparison).
pub fn internet_flagged(percent: f64, threshold: f64) -> bool {
    percent >= threshold
}

pub struct ReviewService {
    store: SubmissionStore,
    scanner: Option<Arc<dyn RemoteScanner>>,
}

impl ReviewService {
    pub fn new(store: SubmissionStore, scanner: Option<Arc<dyn RemoteScanner>>) -> Self {
        Self { store, scanner }
    }

    pub fn has_scanner(&self) -> bool {
        self.scanner.is_some()
    }

    pub fn store(&self) -> &SubmissionStore {
        &self.store
    }

    /// Run the full pipeline for one submission.
    ///
    /// Empty input is rejected before anything is read or written. The
    /// submission is archived exactly once, whether or not the remote scan
    /// succeeded; a vendor failure is carried in the outcome, not returned as
    /// an error.
    pub async fn review(
        &self,
        submitter: UserId,
        handle: Option<String>,
        text: &str,
    ) -> Result<Review> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("empty submission text".to_string()));
        }

        let corpus = self.store.all().await?;
        let local = best_match(text, &corpus);

        let remote = match &self.scanner {
            None => RemoteOutcome::Skipped,
            Some(scanner) => match scanner.scan(text).await {
                Ok(report) => RemoteOutcome::Scored(report.matched_percent),
                Err(e) => {
                    warn!("remote scan failed: {e}");
                    RemoteOutcome::Failed(e.to_string())
                }
            },
        };

        let internet_score = match &remote {
            RemoteOutcome::Scored(p) => Some(*p),
            _ => None,
        };

        let saved = self
            .store
            .insert(NewSubmission {
                submitter,
                handle,
                text: text.to_string(),
                internet_score,
            })
            .await?;

        info!(
            submission_id = saved.id,
            corpus = corpus.len(),
            "submission archived"
        );

        Ok(Review {
            local,
            remote,
            submission_id: saved.id,
        })
    }
}
