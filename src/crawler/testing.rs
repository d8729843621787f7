//! Canned-response fetcher shared by the crawl engine tests

use crate::crawler::{FetchResult, Fetcher};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct MockFetcher {
    responses: HashMap<String, FetchResult>,
    panics: HashSet<String>,
    delay: Option<Duration>,
    hits: Mutex<HashMap<String, usize>>,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serves `html` with status 200 for `url`
    pub(crate) fn page(mut self, url: &str, html: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchResult::Success {
                final_url: url.to_string(),
                status_code: 200,
                body: html.to_string(),
            },
        );
        self
    }

    /// Serves `html` for `url` as if it had been redirected to `final_url`
    pub(crate) fn redirect(mut self, url: &str, final_url: &str, html: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchResult::Success {
                final_url: final_url.to_string(),
                status_code: 200,
                body: html.to_string(),
            },
        );
        self
    }

    pub(crate) fn status(mut self, url: &str, status_code: u16) -> Self {
        self.responses
            .insert(url.to_string(), FetchResult::HttpError { status_code });
        self
    }

    pub(crate) fn panic_on(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn hits(&self, url: &str) -> usize {
        self.hit_map().get(url).copied().unwrap_or(0)
    }

    pub(crate) fn total_hits(&self) -> usize {
        self.hit_map().values().sum()
    }

    pub(crate) fn max_hits(&self) -> usize {
        self.hit_map().values().copied().max().unwrap_or(0)
    }

    fn hit_map(&self) -> std::sync::MutexGuard<'_, HashMap<String, usize>> {
        self.hits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        *self.hit_map().entry(url.to_string()).or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.panics.contains(url) {
            panic!("mock fetcher refused {}", url);
        }

        self.responses
            .get(url)
            .cloned()
            .unwrap_or(FetchResult::HttpError { status_code: 404 })
    }
}
