//! Output module for crawl reports
//!
//! This module handles:
//! - The `CrawlReport` returned by a finished crawl
//! - Printing results and checkpoint statistics to the console
//! - Writing a markdown summary file

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{CrawlReport, OutputError, OutputResult};
pub use stats::{print_checkpoint_stats, print_report};
