use async_trait::async_trait;
use tracing::debug;

use crate::app::ports::PageFetcher;
use crate::config::HttpConfig;
use crate::error::{Result, ScraperError};

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ScraperError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScraperError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::fetch(url, format!("HTTP status {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| ScraperError::fetch(url, e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let t_fetch = std::time::Instant::now();
        let result = self.get_text(url).await;
        let secs = t_fetch.elapsed().as_secs_f64();
        match &result {
            Ok(body) => {
                debug!("fetched {} bytes from {} in {:.2}s", body.len(), url, secs);
                crate::metrics::page_fetched(body.len(), secs);
            }
            Err(_) => crate::metrics::fetch_failed(),
        }
        result
    }
}
