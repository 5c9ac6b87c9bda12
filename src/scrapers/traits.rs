use crate::error::Result;
use async_trait::async_trait;

/// Source of raw search-results markup.
/// This allows swapping the HTTP transport for fixtures in tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page at `url` and return its body
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Get the name of the page source
    fn source_name(&self) -> &'static str;
}
