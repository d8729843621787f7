//! Product-Scout main entry point
//!
//! This is the command-line interface for the Product-Scout crawler.

use anyhow::Context;
use clap::Parser;
use product_scout::config::{load_config_with_hash, Config};
use product_scout::crawler::run_crawl;
use product_scout::output::{generate_markdown_summary, print_checkpoint_stats, print_report};
use product_scout::storage::{open_storage, CheckpointStore};
use product_scout::url::root_domain_of;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Product-Scout: a resumable product page crawler
///
/// Product-Scout crawls a fixed list of e-commerce domains, stays inside
/// each domain's registrable root, and records which pages are product
/// pages. Progress is checkpointed so an interrupted crawl can resume.
#[derive(Parser, Debug)]
#[command(name = "product-scout")]
#[command(version = "1.0.0")]
#[command(about = "A resumable, domain-scoped product page crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume from the checkpoint (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, ignoring the checkpoint
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the checkpoint and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Print every product URL after the crawl
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config);
    } else {
        handle_crawl(config, config_hash, cli.fresh, cli.list).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("product_scout=info,warn"),
            1 => EnvFilter::new("product_scout=debug,info"),
            2 => EnvFilter::new("product_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Product-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Workers: {}", config.crawler.max_workers);
    println!("  Idle timeout: {}s", config.crawler.idle_timeout_secs);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!(
        "  Checkpoint interval: {} pages",
        config.crawler.checkpoint_interval
    );

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Referer: {}", config.http.referer);

    println!("\nOutput:");
    println!("  Checkpoint: {}", config.checkpoint.path);
    if let Some(summary_path) = &config.output.summary_path {
        println!("  Summary: {}", summary_path);
    }

    println!("\nDomains ({}):", config.domains.len());
    let mut seeds = 0;
    for entry in &config.domains {
        match entry.seed_url() {
            Ok(url) => {
                println!("  - {} -> {} (root {})", entry.name, url, root_domain_of(&url));
                seeds += 1;
            }
            Err(e) => println!("  - {} (invalid seed: {})", entry.name, e),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", seeds);
}

/// Handles the --stats mode: shows what the checkpoint holds
fn handle_stats(config: &Config) {
    println!("Checkpoint: {}\n", config.checkpoint.path);

    let checkpoint = open_storage(Path::new(&config.checkpoint.path)).load();
    print_checkpoint_stats(&checkpoint);
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: String,
    fresh: bool,
    list: bool,
) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume from checkpoint if present)");
    }

    let summary_path = config.output.summary_path.clone();

    let report = run_crawl(config, Some(config_hash), fresh)
        .await
        .context("Crawl failed to start")?;

    print_report(&report, list);

    if let Some(path) = summary_path {
        generate_markdown_summary(&report, Path::new(&path))?;
        println!("\n✓ Summary exported to: {}", path);
    }

    Ok(())
}
