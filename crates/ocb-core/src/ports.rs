use async_trait::async_trait;

use crate::Result;

/// Outcome of a completed remote plagiarism scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemoteReport {
    /// Percentage of matched content, 0..=100.
    pub matched_percent: f64,
}

/// Hexagonal port for an external plagiarism scanner.
///
/// The production implementation lives in the Copyleaks adapter crate; the
/// review pipeline only sees this trait, so tests supply fakes.
#[async_trait]
pub trait RemoteScanner: Send + Sync {
    /// Submit `text` and block until the vendor reports a terminal result.
    async fn scan(&self, text: &str) -> Result<RemoteReport>;
}
