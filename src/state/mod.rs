//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlTask`: a queued `(url, depth, root_domain)` unit of work
//! - `CrawlState`: visited URLs and product URLs, shared by all workers
//! - `TaskOutcome`: how a dequeued task ended, tallied in `CrawlCounters`

mod crawl_state;
mod outcome;
mod task;

// Re-export main types
pub use crawl_state::CrawlState;
pub use outcome::{CounterSnapshot, CrawlCounters, TaskOutcome};
pub use task::CrawlTask;
