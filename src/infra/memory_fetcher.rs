use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::app::ports::PageFetcher;
use crate::error::{Result, ScraperError};

/// Serves pages from memory. URLs registered with [`fail_times`](Self::fail_times)
/// fail that many times before succeeding; unknown URLs always fail.
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    pages: HashMap<String, String>,
    failures: Mutex<HashMap<String, u32>>,
    requests: Mutex<Vec<String>>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), markup.into());
        self
    }

    pub fn fail_times(self, url: impl Into<String>, times: u32) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(url.into(), times);
        }
        self
    }

    /// Every URL requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl PageFetcher for InMemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        if let Ok(mut failures) = self.failures.lock() {
            if let Some(remaining) = failures.get_mut(url) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(ScraperError::fetch(url, "simulated transport error"));
                }
            }
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScraperError::fetch(url, "HTTP status 404 Not Found"))
    }
}
