use crate::error::{Result, WatchError};
use crate::models::Field;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_LINE_NOTIFY_API: &str = "https://notify-api.line.me/api/notify";
pub const TOKEN_ENV: &str = "LINE_NOTIFY_TOKEN";

/// Settings for one watch run, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search-results URL for page 1
    pub result_url: String,
    /// Base URL prepended to relative listing links
    pub site_url: String,
    /// Snapshot CSV path
    #[serde(rename = "data")]
    pub data_path: PathBuf,
    /// Log file path
    #[serde(rename = "log")]
    pub log_path: PathBuf,
    /// Size at which the log file rolls over
    #[serde(default = "default_log_max_bytes")]
    pub log_max_bytes: u64,
    /// Rolled-over log files kept next to the live one
    #[serde(default = "default_log_backups")]
    pub log_backups: usize,
    #[serde(default = "Field::header")]
    pub header: Vec<String>,
    #[serde(default = "default_line_notify_api")]
    pub line_notify_api: String,
    #[serde(default)]
    pub line_notify_token: String,
    #[serde(default)]
    pub notify_on_first_run: bool,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_line_notify_api() -> String {
    DEFAULT_LINE_NOTIFY_API.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_log_max_bytes() -> u64 {
    100_000
}

fn default_log_backups() -> usize {
    10
}

impl Config {
    /// Read and validate a JSON config file, applying the token env override
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| WatchError::Config(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::from_json(&raw)?;

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                config.line_notify_token = token;
            }
        }

        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.result_url.trim().is_empty() {
            return Err(WatchError::Config("result_url is empty".to_string()));
        }
        if self.header != Field::header() {
            return Err(WatchError::Config(format!(
                "header must be {:?}, got {:?}",
                Field::header(),
                self.header
            )));
        }
        if self.log_max_bytes == 0 {
            return Err(WatchError::Config("log_max_bytes must be positive".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(WatchError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// URL of the given 1-based results page
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            return self.result_url.clone();
        }
        let sep = if self.result_url.contains('?') { '&' } else { '?' };
        format!("{}{}pn={}", self.result_url, sep, page)
    }

    pub fn has_push_credentials(&self) -> bool {
        !self.line_notify_token.trim().is_empty()
    }
}
