//! Console rendering of crawl results
//!
//! This module provides functionality for displaying a finished crawl's
//! report and the contents of a saved checkpoint.

use crate::output::CrawlReport;
use crate::storage::Checkpoint;
use std::collections::{BTreeMap, BTreeSet};

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
/// * `list_urls` - Also print every product URL under its domain
pub fn print_report(report: &CrawlReport, list_urls: bool) {
    println!("=== Crawl Results ===\n");

    println!("Run:");
    println!(
        "  Duration: {:.1}s ({:.2} pages/sec)",
        report.duration.as_secs_f64(),
        report.pages_per_sec()
    );
    println!("  Pages fetched: {}", report.counters.fetched);
    println!("  Fetch failures: {}", report.counters.failed);
    println!("  Skipped (depth limit): {}", report.counters.depth_exceeded);
    println!("  Skipped (already visited): {}", report.counters.already_visited);
    if report.counters.panics > 0 {
        println!("  Worker panics: {}", report.counters.panics);
    }
    println!(
        "  Success rate: {:.1}% ({} / {} fetches)",
        report.success_rate(),
        report.counters.processed,
        report.counters.fetched
    );
    println!();

    print_domains(&report.domains, list_urls);

    println!(
        "Total: {} product URLs, {} visited URLs",
        report.total_products(),
        report.visited_total
    );

    if let Some(error) = &report.checkpoint_error {
        println!("\nWarning: checkpoint was not saved: {}", error);
    }
}

/// Prints the contents of a saved checkpoint
pub fn print_checkpoint_stats(checkpoint: &Checkpoint) {
    println!("=== Checkpoint Statistics ===\n");

    println!("Overview:");
    println!("  Visited URLs: {}", checkpoint.visited_urls.len());
    println!("  Product URLs: {}", checkpoint.product_count());
    println!("  Domains: {}", checkpoint.product_urls.len());
    if let Some(saved_at) = checkpoint.saved_at {
        println!("  Saved at: {}", saved_at.to_rfc3339());
    }
    if let Some(hash) = &checkpoint.config_hash {
        println!("  Config hash: {}", hash);
    }
    println!();

    print_domains(&checkpoint.product_urls, false);
}

fn print_domains(domains: &BTreeMap<String, BTreeSet<String>>, list_urls: bool) {
    if domains.is_empty() {
        return;
    }

    println!("Product URLs by Domain:");
    // Busiest domains first
    let mut counts: Vec<_> = domains.iter().collect();
    counts.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

    for (domain, urls) in counts {
        println!("  {}: {}", domain, urls.len());
        if list_urls {
            for url in urls {
                println!("    - {}", url);
            }
        }
    }
    println!();
}
