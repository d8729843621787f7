//! Crawl report types
//!
//! This module defines the report returned by a finished crawl and the
//! error type of the output layer.

use crate::state::{CounterSnapshot, CrawlState};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Final result of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Product URLs per seed root domain, including domains with none
    pub domains: BTreeMap<String, BTreeSet<String>>,

    /// Total visited URLs, including those loaded from the checkpoint
    pub visited_total: usize,

    /// Task counters for this run only
    pub counters: CounterSnapshot,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Set when the final checkpoint could not be written
    pub checkpoint_error: Option<String>,

    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Builds the report from the state at the end of a run
    pub fn from_state(
        state: &CrawlState,
        duration: Duration,
        checkpoint_error: Option<String>,
    ) -> Self {
        Self {
            domains: state.product_urls(),
            visited_total: state.visited_count(),
            counters: state.counters().snapshot(),
            duration,
            checkpoint_error,
            finished_at: Utc::now(),
        }
    }

    /// Product URLs across all domains
    pub fn total_products(&self) -> usize {
        self.domains.values().map(BTreeSet::len).sum()
    }

    /// Product URLs found for one root domain (empty if unknown)
    pub fn products_for(&self, domain: &str) -> BTreeSet<String> {
        self.domains.get(domain).cloned().unwrap_or_default()
    }

    /// Percentage of fetches in this run that returned a page
    pub fn success_rate(&self) -> f64 {
        if self.counters.fetched == 0 {
            return 0.0;
        }
        (self.counters.processed as f64 / self.counters.fetched as f64) * 100.0
    }

    /// Fetched pages per second
    pub fn pages_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.counters.fetched as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> CrawlState {
        let state = CrawlState::new();
        state.ensure_domain("example.org");
        for url in ["https://example.com/", "https://example.com/p/1"] {
            state.mark_visited(url);
        }
        state.record_product("example.com", "https://example.com/p/1");
        state
    }

    #[test]
    fn test_report_from_state() {
        let report = CrawlReport::from_state(&sample_state(), Duration::from_secs(2), None);

        assert_eq!(report.total_products(), 1);
        assert_eq!(report.visited_total, 2);
        assert!(report.products_for("example.org").is_empty());
        assert!(report.domains.contains_key("example.org"));
        assert!(report.products_for("unknown.net").is_empty());
    }

    #[test]
    fn test_rates_with_no_fetches() {
        let report = CrawlReport::from_state(&CrawlState::new(), Duration::ZERO, None);
        assert_eq!(report.success_rate(), 0.0);
        assert_eq!(report.pages_per_sec(), 0.0);
    }
}
