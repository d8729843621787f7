use crate::state::CrawlState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Persisted snapshot of crawl progress
///
/// The JSON shape is two top-level keys, `visited_urls` and `product_urls`,
/// plus optional metadata. Sets are written as sorted arrays; order carries no
/// meaning when loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(default)]
    pub visited_urls: BTreeSet<String>,

    #[serde(default)]
    pub product_urls: BTreeMap<String, BTreeSet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
}

impl Checkpoint {
    /// Captures the current crawl state
    pub fn capture(state: &CrawlState, config_hash: Option<String>) -> Self {
        Self {
            visited_urls: state.visited_urls(),
            product_urls: state.product_urls(),
            saved_at: Some(Utc::now()),
            config_hash,
        }
    }

    /// Rebuilds crawl state from this checkpoint
    pub fn into_state(self) -> CrawlState {
        CrawlState::from_parts(self.visited_urls, self.product_urls)
    }

    pub fn is_empty(&self) -> bool {
        self.visited_urls.is_empty() && self.product_urls.values().all(BTreeSet::is_empty)
    }

    pub fn product_count(&self) -> usize {
        self.product_urls.values().map(BTreeSet::len).sum()
    }
}
