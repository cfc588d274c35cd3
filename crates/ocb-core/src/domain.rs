use chrono::{DateTime, Utc};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// One archived piece of submitted work.
///
/// Rows are immutable once written: the store assigns `id` and `created_at`,
/// and nothing updates or deletes a submission afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub submitter: UserId,
    pub handle: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Percentage reported by the internet scan, when one ran and succeeded.
    pub internet_score: Option<f64>,
}

impl Submission {
    /// Display handle, falling back to the numeric submitter id.
    pub fn display_handle(&self) -> String {
        match &self.handle {
            Some(h) if !h.is_empty() => h.clone(),
            _ => self.submitter.0.to_string(),
        }
    }
}

/// A submission that has not been archived yet.
#[derive(Clone, Debug)]
pub struct NewSubmission {
    pub submitter: UserId,
    pub handle: Option<String>,
    pub text: String,
    pub internet_score: Option<f64>,
}
