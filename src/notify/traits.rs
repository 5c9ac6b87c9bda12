use crate::error::Result;
use async_trait::async_trait;

/// Push channel for rendered notification text.
/// Delivery is best-effort; callers log failures instead of propagating them.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message
    async fn notify(&self, message: &str) -> Result<()>;

    /// Name of the channel, for logs
    fn channel_name(&self) -> &'static str;
}
