//! Local lexical similarity against the stored corpus.
//!
//! The scorer is a full linear scan: every new text is compared against every
//! archived submission and the single best match wins. No indexing, no
//! incremental structures; the corpus is read in full by the caller.

use strsim::normalized_levenshtein;

use crate::domain::Submission;

/// Best local match for a new text.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalMatch {
    /// Overlap ratio in [0, 1].
    pub ratio: f64,
    pub submission_id: i64,
    /// Owner's display handle (numeric id when no username is known).
    pub handle: String,
}

/// Normalize text for comparison (lowercase, collapse whitespace).
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized overlap ratio between two texts, in [0, 1].
pub fn ratio(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    normalized_levenshtein(&a, &b)
}

/// Scan the whole corpus and return the single highest-scoring match.
///
/// Returns `None` only for an empty corpus; once any history exists there is
/// always a candidate, however dissimilar.
pub fn best_match(text: &str, corpus: &[Submission]) -> Option<LocalMatch> {
    let mut best: Option<LocalMatch> = None;

    for sub in corpus {
        let r = ratio(text, &sub.text);
        if best.as_ref().map(|b| r > b.ratio).unwrap_or(true) {
            best = Some(LocalMatch {
                ratio: r,
                submission_id: sub.id,
                handle: sub.display_handle(),
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use chrono::Utc;

    fn sub(id: i64, submitter: i64, handle: Option<&str>, text: &str) -> Submission {
        Submission {
            id,
            submitter: UserId(submitter),
            handle: handle.map(|s| s.to_string()),
            text: text.to_string(),
            created_at: Utc::now(),
            internet_score: None,
        }
    }

    #[test]
    fn ratio_is_one_for_verbatim_text() {
        assert!((ratio("The quick brown fox", "The quick brown fox") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_ignores_case_and_spacing() {
        assert!((ratio("Hello   World", "hello world") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_stays_within_unit_interval() {
        let pairs = [
            ("a", "completely different text"),
            ("one two three", "one two"),
            ("short", "short!"),
            ("x", "y"),
        ];
        for (a, b) in pairs {
            let r = ratio(a, b);
            assert!((0.0..=1.0).contains(&r), "ratio({a:?}, {b:?}) = {r}");
        }
    }

    #[test]
    fn empty_corpus_yields_no_match() {
        assert_eq!(best_match("anything", &[]), None);
    }

    #[test]
    fn nonempty_corpus_always_yields_a_candidate() {
        let corpus = vec![sub(1, 10, Some("alice"), "entirely unrelated essay")];
        let m = best_match("zzzz", &corpus).unwrap();
        assert_eq!(m.submission_id, 1);
        assert!(m.ratio < 0.7);
    }

    #[test]
    fn picks_the_highest_scoring_submission() {
        let corpus = vec![
            sub(1, 10, Some("alice"), "an essay about rivers and lakes"),
            sub(2, 11, None, "an essay about rivers and oceans"),
            sub(3, 12, Some("bob"), "unrelated musings on compilers"),
        ];
        let m = best_match("an essay about rivers and oceans", &corpus).unwrap();
        assert_eq!(m.submission_id, 2);
        // No username on record: the handle falls back to the numeric id.
        assert_eq!(m.handle, "11");
        assert!((m.ratio - 1.0).abs() < 1e-9);
    }
}
