use std::{env, fs, path::PathBuf, time::Duration};

use crate::review::{DEFAULT_INTERNET_THRESHOLD, DEFAULT_SIMILARITY_THRESHOLD};
use crate::{errors::Error, Result};

/// Typed configuration loaded from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    /// Externally reachable base URL for the webhook; `None` means long polling.
    pub webhook_base_url: Option<String>,
    pub port: u16,

    // Remote scanner; `None` means local-only checks.
    pub copyleaks: Option<CopyleaksCredentials>,
    pub scan_poll_interval: Duration,

    // Storage
    pub database_path: PathBuf,

    // Scoring thresholds (both inclusive).
    pub similarity_threshold: f64,
    pub internet_match_threshold: f64,

    // Transient document downloads land here.
    pub temp_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct CopyleaksCredentials {
    pub email: String,
    pub api_key: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        // Required env vars
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        // Webhook surface is optional; without a public base URL the bot polls.
        let webhook_base_url = env_str("WEBHOOK_BASE_URL")
            .and_then(non_empty)
            .map(|u| u.trim_end_matches('/').to_string());
        let port = env_u16("PORT").unwrap_or(8080);

        // Copyleaks account: both values or neither.
        let copyleaks = match (
            env_str("COPYLEAKS_EMAIL").and_then(non_empty),
            env_str("COPYLEAKS_API_KEY").and_then(non_empty),
        ) {
            (Some(email), Some(api_key)) => Some(CopyleaksCredentials { email, api_key }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "COPYLEAKS_EMAIL and COPYLEAKS_API_KEY must be set together".to_string(),
                ))
            }
        };
        let scan_poll_interval =
            Duration::from_secs(env_u64("SCAN_POLL_INTERVAL_SECS").unwrap_or(3).max(1));

        let database_path =
            env_path("DATABASE_PATH").unwrap_or_else(|| PathBuf::from("submissions.db"));

        let similarity_threshold =
            env_f64("SIMILARITY_THRESHOLD").unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);
        if !(0.0..=1.0).contains(&similarity_threshold) {
            return Err(Error::Config(
                "SIMILARITY_THRESHOLD must be within 0..=1".to_string(),
            ));
        }
        let internet_match_threshold =
            env_f64("INTERNET_MATCH_THRESHOLD").unwrap_or(DEFAULT_INTERNET_THRESHOLD);
        if !(0.0..=100.0).contains(&internet_match_threshold) {
            return Err(Error::Config(
                "INTERNET_MATCH_THRESHOLD must be within 0..=100".to_string(),
            ));
        }

        let temp_dir = env_path("TEMP_DIR").unwrap_or_else(|| PathBuf::from("/tmp/ocb"));
        fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            telegram_bot_token,
            webhook_base_url,
            port,
            copyleaks,
            scan_poll_interval,
            database_path,
            similarity_threshold,
            internet_match_threshold,
            temp_dir,
        })
    }

    /// Full webhook URL; the path carries the bot token, so only Telegram can
    /// guess it.
    pub fn webhook_url(&self) -> Option<String> {
        self.webhook_base_url
            .as_ref()
            .map(|base| format!("{base}/webhook/{}", self.telegram_bot_token))
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u16(key: &str) -> Option<u16> {
    env_str(key).and_then(|s| s.trim().parse::<u16>().ok())
}

fn env_f64(key: &str) -> Option<f64> {
    env_str(key).and_then(|s| s.trim().parse::<f64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
