//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` seam
//! - HTML parsing and link extraction
//! - The shared frontier queue and the worker pool draining it
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
#[cfg(test)]
mod testing;
mod worker;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher, HttpFetcher};
pub use frontier::{Frontier, Popped, TaskGuard};
pub use parser::{parse_html, ParsedPage};
pub use worker::{process_task, run_worker, CrawlContext};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::ScoutError;

/// Runs a complete crawl, resuming from the configured checkpoint
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Load the checkpoint
/// 2. Build the HTTP client
/// 3. Seed one task per configured domain
/// 4. Run the worker pool until the frontier is drained
/// 5. Save the checkpoint and return the report
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(ScoutError)` - Crawl could not start
pub async fn crawl(config: Config) -> Result<CrawlReport, ScoutError> {
    run_crawl(config, None, false).await
}
