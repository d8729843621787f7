//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the run sequence that ties the crawl engine together:
//! - Loading (or ignoring) the previous checkpoint
//! - Seeding the frontier with one task per configured domain
//! - Starting the worker pool and waiting for quiescence
//! - Shutting the workers down and persisting the final state
//! - Building the crawl report

use crate::classifier::{ClassifierPolicy, ProductClassifier};
use crate::config::Config;
use crate::crawler::frontier::Frontier;
use crate::crawler::worker::{run_worker, CrawlContext};
use crate::crawler::{Fetcher, HttpFetcher};
use crate::output::CrawlReport;
use crate::state::{CrawlState, CrawlTask};
use crate::storage::{open_storage, CheckpointStore, Checkpointer};
use crate::url::root_domain_of;
use crate::ScoutError;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn CheckpointStore>,
    config_hash: Option<String>,
}

impl Coordinator {
    /// Creates a coordinator over the given fetch and checkpoint backends
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `fetcher` - Page fetch transport
    /// * `store` - Checkpoint persistence backend
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>, store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            store,
            config_hash: None,
        }
    }

    /// Tags checkpoints written by this coordinator with a config hash
    pub fn with_config_hash(mut self, config_hash: impl Into<String>) -> Self {
        self.config_hash = Some(config_hash.into());
        self
    }

    /// Runs one complete crawl
    ///
    /// With `fresh` set, the previous checkpoint is ignored and replaced when
    /// this run saves. The report is returned even when fetches fail or the
    /// final checkpoint cannot be written.
    pub async fn run(&self, fresh: bool) -> CrawlReport {
        let started = Instant::now();
        let checkpointer = Arc::new(Checkpointer::new(
            Arc::clone(&self.store),
            self.config_hash.clone(),
            self.config.crawler.checkpoint_interval,
        ));

        let state = if fresh {
            tracing::info!(
                "Starting fresh crawl, ignoring checkpoint at {}",
                checkpointer.location()
            );
            CrawlState::new()
        } else {
            let checkpoint = checkpointer.load();
            if !checkpoint.is_empty() {
                tracing::info!(
                    "Resuming from checkpoint: {} visited URLs, {} product URLs",
                    checkpoint.visited_urls.len(),
                    checkpoint.product_count()
                );
            }
            checkpoint.into_state()
        };

        let ctx = Arc::new(CrawlContext {
            max_depth: self.config.crawler.max_depth,
            idle_timeout: self.config.crawler.idle_timeout(),
            frontier: Frontier::new(),
            state: Arc::new(state),
            fetcher: Arc::clone(&self.fetcher),
            classifier: ProductClassifier::new(ClassifierPolicy::from_config(
                &self.config.classifier,
            )),
            checkpointer: Arc::clone(&checkpointer),
        });

        let seeded = self.seed(&ctx);
        tracing::info!(
            "Starting crawl of {} domains with {} workers (max depth {})",
            seeded,
            self.config.crawler.max_workers,
            self.config.crawler.max_depth
        );

        let mut workers = JoinSet::new();
        for id in 0..self.config.crawler.max_workers as usize {
            workers.spawn(run_worker(id, Arc::clone(&ctx)));
        }

        tokio::select! {
            _ = ctx.frontier.join() => {
                tracing::debug!("Frontier drained, stopping workers");
            }
            _ = reap_workers(&mut workers) => {
                let outstanding = ctx.frontier.outstanding();
                if outstanding > 0 {
                    tracing::warn!("All workers exited with {} tasks outstanding", outstanding);
                }
            }
        }

        ctx.frontier.close();
        reap_workers(&mut workers).await;

        let checkpoint_error = match checkpointer.save(&ctx.state) {
            Ok(()) => {
                tracing::info!("Saved checkpoint to {}", checkpointer.location());
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to save checkpoint to {}: {}",
                    checkpointer.location(),
                    e
                );
                Some(e.to_string())
            }
        };

        let report = CrawlReport::from_state(&ctx.state, started.elapsed(), checkpoint_error);

        tracing::info!(
            "Crawl completed. Found {} product URLs across all domains",
            report.total_products()
        );
        for (domain, urls) in &report.domains {
            tracing::info!("{}: {} product URLs", domain, urls.len());
        }

        report
    }

    /// Pushes one depth-0 task per configured domain
    ///
    /// Returns the number of domains seeded.
    fn seed(&self, ctx: &CrawlContext) -> usize {
        let mut seeded = 0;

        for entry in &self.config.domains {
            let url = match entry.seed_url() {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping domain {}: invalid seed URL: {}", entry.name, e);
                    continue;
                }
            };

            let root = root_domain_of(&url);
            if root.is_empty() {
                tracing::warn!("Skipping domain {}: {} has no root domain", entry.name, url);
                continue;
            }

            ctx.state.ensure_domain(&root);
            if ctx.frontier.push(CrawlTask::seed(url.as_str(), root.as_str())) {
                tracing::debug!("Seeded {} (root domain {})", url, root);
                seeded += 1;
            }
        }

        seeded
    }
}

/// Waits for every worker in the set to exit
async fn reap_workers(workers: &mut JoinSet<usize>) {
    while let Some(result) = workers.join_next().await {
        if let Err(e) = result {
            tracing::error!("Worker terminated abnormally: {}", e);
        }
    }
}

/// Runs a crawl with the production HTTP fetcher and JSON checkpoint store
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the config file, stored in the checkpoint
/// * `fresh` - Ignore the existing checkpoint
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished
/// * `Err(ScoutError)` - The HTTP client could not be built
///
/// # Example
///
/// ```no_run
/// use product_scout::config::load_config;
/// use product_scout::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_crawl(config, None, false).await?;
/// println!("{} product URLs", report.total_products());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    config_hash: Option<String>,
    fresh: bool,
) -> Result<CrawlReport, ScoutError> {
    let fetcher = HttpFetcher::new(&config.http, config.crawler.fetch_timeout())?;
    let store = open_storage(Path::new(&config.checkpoint.path));

    let mut coordinator = Coordinator::new(config, Arc::new(fetcher), Arc::new(store));
    if let Some(hash) = config_hash {
        coordinator = coordinator.with_config_hash(hash);
    }

    Ok(coordinator.run(fresh).await)
}
