use crate::error::{LuckyDrawError, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

pub const REST_URL_ENV: &str = "LUCKYDRAW_REST_URL";
pub const API_KEY_ENV: &str = "LUCKYDRAW_API_KEY";

/// Connection settings for a hosted PostgREST-style store.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
    pub participants_table: String,
    pub history_table: String,
    /// Per-request timeout, in milliseconds in config files.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub timeout: Duration,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            participants_table: "participants".to_string(),
            history_table: "lottery_history".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Overlay `LUCKYDRAW_REST_URL` / `LUCKYDRAW_API_KEY` when they are set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(REST_URL_ENV) {
            self.base_url = url;
        }
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.api_key = key;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(LuckyDrawError::config("REST base URL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LuckyDrawError::config(format!(
                "REST base URL must be http(s): {}",
                self.base_url
            )));
        }

        if self.api_key.is_empty() {
            return Err(LuckyDrawError::config(format!(
                "API key is required (set {})",
                API_KEY_ENV
            )));
        }

        if self.participants_table.is_empty() || self.history_table.is_empty() {
            return Err(LuckyDrawError::config("Table names cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(LuckyDrawError::config("Request timeout must be greater than 0"));
        }

        Ok(())
    }
}
