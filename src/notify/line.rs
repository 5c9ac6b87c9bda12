use crate::config::Config;
use crate::error::{Result, WatchError};
use crate::notify::traits::Notifier;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// LINE Notify push channel
pub struct LineNotifier {
    client: Client,
    endpoint: String,
    token: String,
}

impl LineNotifier {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| WatchError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.line_notify_api.clone(),
            token: config.line_notify_token.clone(),
        })
    }
}

#[async_trait]
impl Notifier for LineNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        debug!(endpoint = %self.endpoint, bytes = message.len(), "Posting LINE notification");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .form(&[("message", message)])
            .send()
            .await
            .map_err(|e| WatchError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::Notification(format!("{status}: {body}")));
        }

        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "LINE Notify"
    }
}

/// Notifier that only writes messages to the log, used when no token is set
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        info!("📨 {}", message);
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "log"
    }
}
