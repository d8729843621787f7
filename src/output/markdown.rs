//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl,
//! with run statistics and the product URLs found per domain.

use crate::output::{CrawlReport, OutputError, OutputResult};
use std::fs;
use std::path::Path;

/// Writes the markdown summary of a report to `output_path`
///
/// # Arguments
///
/// * `report` - The finished crawl's report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    fs::write(output_path, markdown).map_err(|source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    })
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Product-Scout Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Finished**: {}\n",
        report.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        report.duration.as_secs_f64()
    ));
    if let Some(error) = &report.checkpoint_error {
        md.push_str(&format!("- **Checkpoint**: not saved ({})\n", error));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Product URLs**: {}\n",
        report.total_products()
    ));
    md.push_str(&format!("- **Visited URLs**: {}\n", report.visited_total));
    md.push_str(&format!(
        "- **Pages Fetched**: {}\n",
        report.counters.fetched
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    md.push_str("## Task Breakdown\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Processed | {} |\n", report.counters.processed));
    md.push_str(&format!("| Fetch Failed | {} |\n", report.counters.failed));
    md.push_str(&format!(
        "| Depth Exceeded | {} |\n",
        report.counters.depth_exceeded
    ));
    md.push_str(&format!(
        "| Already Visited | {} |\n",
        report.counters.already_visited
    ));
    md.push_str(&format!("| Panicked | {} |\n\n", report.counters.panics));

    md.push_str("## Product URLs by Domain\n\n");
    md.push_str("| Domain | Products |\n");
    md.push_str("|--------|----------|\n");
    for (domain, urls) in &report.domains {
        md.push_str(&format!("| {} | {} |\n", domain, urls.len()));
    }
    md.push('\n');

    for (domain, urls) in &report.domains {
        if urls.is_empty() {
            continue;
        }
        md.push_str(&format!("### {}\n\n", domain));
        for url in urls {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md
}
