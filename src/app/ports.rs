use async_trait::async_trait;

use crate::error::Result;

/// Retrieves raw markup for a URL.
///
/// Implementations fail with [`ScraperError::Fetch`](crate::error::ScraperError::Fetch)
/// on transport errors and non-success statuses, and never retry on their own.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
