//! Copyleaks adapter (remote plagiarism scanning).
//!
//! Implements the vendor's job lifecycle: authenticate for a bearer token,
//! submit the text as a scan job, poll the job status on a fixed interval,
//! then fetch the aggregated result percentage. No retries and no poll
//! ceiling; a scan blocks its caller until the vendor reports a terminal
//! status.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use ocb_core::{
    errors::Error,
    ports::{RemoteReport, RemoteScanner},
    Result,
};

const LOGIN_URL: &str = "https://id.copyleaks.com/v3/account/login/api";
const SCANS_BASE: &str = "https://api.copyleaks.com/v3/scans";

#[derive(Clone, Debug)]
pub struct CopyleaksClient {
    email: String,
    api_key: String,
    poll_interval: Duration,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "scanId")]
    scan_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    #[serde(rename = "aggregatedScore")]
    aggregated_score: Option<f64>,
}

fn is_completed(status: &str) -> bool {
    status.eq_ignore_ascii_case("completed")
}

fn is_failed(status: &str) -> bool {
    matches!(status.to_ascii_lowercase().as_str(), "failed" | "error")
}

impl CopyleaksClient {
    pub fn new(
        email: impl Into<String>,
        api_key: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client build");

        Self {
            email: email.into(),
            api_key: api_key.into(),
            poll_interval,
            http,
        }
    }

    async fn login(&self) -> Result<String> {
        let resp = self
            .http
            .post(LOGIN_URL)
            .json(&serde_json::json!({
                "email": self.email,
                "apiKey": self.api_key,
            }))
            .send()
            .await
            .map_err(|e| Error::Vendor(format!("copyleaks login request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Vendor(format!(
                "copyleaks login failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let login: LoginResponse = resp
            .json()
            .await
            .map_err(|e| Error::Vendor(format!("copyleaks login json error: {e}")))?;

        Ok(login.access_token)
    }

    async fn submit(&self, token: &str, text: &str) -> Result<String> {
        let resp = self
            .http
            .post(format!("{SCANS_BASE}/submit/text"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| Error::Vendor(format!("copyleaks submit request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Vendor(format!(
                "copyleaks submit failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let submitted: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| Error::Vendor(format!("copyleaks submit json error: {e}")))?;

        Ok(submitted.scan_id)
    }

    async fn status(&self, token: &str, scan_id: &str) -> Result<StatusResponse> {
        let resp = self
            .http
            .get(format!("{SCANS_BASE}/{scan_id}/status"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::Vendor(format!("copyleaks status request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Vendor(format!(
                "copyleaks status failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::Vendor(format!("copyleaks status json error: {e}")))
    }

    async fn results(&self, token: &str, scan_id: &str) -> Result<f64> {
        let resp = self
            .http
            .get(format!("{SCANS_BASE}/{scan_id}/results"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::Vendor(format!("copyleaks results request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Vendor(format!(
                "copyleaks results failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let results: ResultsResponse = resp
            .json()
            .await
            .map_err(|e| Error::Vendor(format!("copyleaks results json error: {e}")))?;

        results.aggregated_score.ok_or_else(|| {
            Error::Vendor("copyleaks results missing aggregated score".to_string())
        })
    }
}

#[async_trait]
impl RemoteScanner for CopyleaksClient {
    async fn scan(&self, text: &str) -> Result<RemoteReport> {
        let token = self.login().await?;
        let scan_id = self.submit(&token, text).await?;
        debug!(scan_id = %scan_id, "copyleaks scan submitted");

        loop {
            let StatusResponse { status, error } = self.status(&token, &scan_id).await?;
            if is_completed(&status) {
                break;
            }
            if is_failed(&status) {
                let detail = error.unwrap_or(status);
                return Err(Error::Vendor(format!("copyleaks scan failed: {detail}")));
            }
            debug!(scan_id = %scan_id, status = %status, "copyleaks scan still running");
            tokio::time::sleep(self.poll_interval).await;
        }

        let matched_percent = self.results(&token, &scan_id).await?;
        Ok(RemoteReport { matched_percent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_recognized_case_insensitively() {
        assert!(is_completed("Completed"));
        assert!(is_completed("completed"));
        assert!(!is_completed("Pending"));

        assert!(is_failed("Failed"));
        assert!(is_failed("error"));
        assert!(!is_failed("Running"));
    }

    #[test]
    fn wire_structs_parse_vendor_payloads() {
        let login: LoginResponse =
            serde_json::from_str(r#"{"access_token":"tok-123",".issued":"now"}"#).unwrap();
        assert_eq!(login.access_token, "tok-123");

        let submitted: SubmitResponse =
            serde_json::from_str(r#"{"scanId":"abc-1"}"#).unwrap();
        assert_eq!(submitted.scan_id, "abc-1");

        let status: StatusResponse =
            serde_json::from_str(r#"{"status":"Failed","error":"credits exhausted"}"#).unwrap();
        assert_eq!(status.status, "Failed");
        assert_eq!(status.error.as_deref(), Some("credits exhausted"));

        let results: ResultsResponse =
            serde_json::from_str(r#"{"aggregatedScore":17.3}"#).unwrap();
        assert_eq!(results.aggregated_score, Some(17.3));

        let empty: ResultsResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(empty.aggregated_score, None);
    }
}
