//! Crawl workers
//!
//! A worker repeatedly takes a task from the frontier, processes it, and
//! records the outcome. It exits when the frontier stays empty past the idle
//! timeout or when the frontier is closed.

use crate::classifier::ProductClassifier;
use crate::crawler::frontier::{Frontier, Popped};
use crate::crawler::parser::{parse_html, ParsedPage};
use crate::crawler::{FetchResult, Fetcher};
use crate::state::{CrawlState, CrawlTask, TaskOutcome};
use crate::storage::Checkpointer;
use crate::url::in_scope;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Everything a worker needs, shared by the whole pool
pub struct CrawlContext {
    pub max_depth: u32,
    pub idle_timeout: Duration,
    pub frontier: Frontier,
    pub state: Arc<CrawlState>,
    pub fetcher: Arc<dyn Fetcher>,
    pub classifier: ProductClassifier,
    pub checkpointer: Arc<Checkpointer>,
}

/// Runs one worker until the frontier goes idle or is closed
///
/// Each task is processed in its own spawned task so that a panic while
/// handling one URL is contained. The dequeued task stays accounted for in
/// the frontier until its outcome has been recorded.
///
/// Returns the number of tasks this worker handled.
pub async fn run_worker(id: usize, ctx: Arc<CrawlContext>) -> usize {
    let mut handled = 0;
    tracing::debug!("Worker {} started", id);

    loop {
        let guard = match ctx.frontier.pop(ctx.idle_timeout).await {
            Popped::Task(guard) => guard,
            Popped::Idle => {
                tracing::debug!(
                    "Worker {} idle for {:?}, exiting",
                    id,
                    ctx.idle_timeout
                );
                break;
            }
            Popped::Closed => {
                tracing::debug!("Worker {} stopping, frontier closed", id);
                break;
            }
        };

        let task = guard.task().clone();
        let url = task.url.clone();
        let job = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { process_task(&ctx, task).await })
        };

        match job.await {
            Ok(outcome) => {
                let fetched = ctx.state.counters().record(&outcome);
                tracing::debug!("Worker {}: {} -> {}", id, url, outcome);
                if outcome.is_fetched() {
                    ctx.checkpointer.maybe_save(&ctx.state, fetched).await;
                }
            }
            Err(e) if e.is_panic() => {
                ctx.state.counters().record_panic();
                tracing::error!("Worker {} panicked while processing {}", id, url);
            }
            Err(e) => {
                tracing::warn!("Worker {}: task for {} was cancelled: {}", id, url, e);
            }
        }

        drop(guard);
        handled += 1;
    }

    tracing::debug!("Worker {} exited after {} tasks", id, handled);
    handled
}

/// Processes a single crawl task
///
/// 1. Discards the task if it is deeper than the maximum depth
/// 2. Claims the URL in the visited set, discarding it if already claimed
/// 3. Fetches the page
/// 4. Parses and classifies it, recording product pages
/// 5. Queues in-scope, unvisited links one level deeper
pub async fn process_task(ctx: &CrawlContext, task: CrawlTask) -> TaskOutcome {
    if task.depth > ctx.max_depth {
        tracing::trace!("Depth {} exceeds limit for {}", task.depth, task.url);
        return TaskOutcome::DepthExceeded;
    }

    if !ctx.state.mark_visited(&task.url) {
        tracing::trace!("Already visited: {}", task.url);
        return TaskOutcome::AlreadyVisited;
    }

    let (final_url, body) = match ctx.fetcher.fetch(&task.url).await {
        FetchResult::Success {
            final_url, body, ..
        } => (final_url, body),
        FetchResult::HttpError { status_code } => {
            tracing::warn!("Failed to fetch {}: HTTP {}", task.url, status_code);
            return TaskOutcome::FetchFailed;
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Failed to fetch {}: {}", task.url, error);
            return TaskOutcome::FetchFailed;
        }
    };

    let page = match Url::parse(&final_url).or_else(|_| Url::parse(&task.url)) {
        Ok(base) => parse_html(&body, &base),
        Err(e) => {
            tracing::debug!("Cannot resolve links for {}: {}", task.url, e);
            ParsedPage::default()
        }
    };

    let product = match ctx.classifier.classify(&task.url, Some(&page)) {
        Some(signal) => {
            match &page.title {
                Some(title) => {
                    tracing::info!("Found product page: {} \"{}\" ({})", task.url, title, signal)
                }
                None => tracing::info!("Found product page: {} ({})", task.url, signal),
            }
            ctx.state.record_product(&task.root_domain, &task.url);
            true
        }
        None => false,
    };

    let mut links_enqueued = 0;
    for link in &page.links {
        if !in_scope(link, &task.root_domain) {
            tracing::trace!("Out of scope for {}: {}", task.root_domain, link);
            continue;
        }
        if ctx.state.is_visited(link) {
            continue;
        }
        if ctx.frontier.push(task.child(link.as_str())) {
            links_enqueued += 1;
        }
    }

    TaskOutcome::Processed {
        product,
        links_enqueued,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::MockFetcher;
    use crate::storage::{CheckpointStore, JsonCheckpointStore};
    use tempfile::TempDir;

    const ROOT: &str = "https://example.com/";

    fn context(fetcher: Arc<MockFetcher>, max_depth: u32) -> CrawlContext {
        let store: Arc<dyn CheckpointStore> =
            Arc::new(JsonCheckpointStore::new("unused_progress.json"));
        let fetcher: Arc<dyn Fetcher> = fetcher;
        CrawlContext {
            max_depth,
            idle_timeout: Duration::from_millis(100),
            frontier: Frontier::new(),
            state: Arc::new(CrawlState::new()),
            fetcher,
            classifier: ProductClassifier::default(),
            checkpointer: Arc::new(Checkpointer::new(store, None, 0)),
        }
    }

    fn root_task() -> CrawlTask {
        CrawlTask::seed(ROOT, "example.com")
    }

    #[tokio::test]
    async fn test_depth_exceeded_is_not_fetched() {
        let fetcher = Arc::new(MockFetcher::new().page(ROOT, "<p>hi</p>"));
        let ctx = context(Arc::clone(&fetcher), 1);

        let deep = root_task().child(ROOT).child(ROOT);
        assert_eq!(process_task(&ctx, deep).await, TaskOutcome::DepthExceeded);
        assert_eq!(fetcher.total_hits(), 0);
        assert!(!ctx.state.is_visited(ROOT));
    }

    #[tokio::test]
    async fn test_task_at_max_depth_is_fetched() {
        let fetcher = Arc::new(MockFetcher::new().page(ROOT, "<p>hi</p>"));
        let ctx = context(Arc::clone(&fetcher), 1);

        let outcome = process_task(&ctx, root_task().child(ROOT)).await;
        assert!(outcome.is_fetched());
        assert_eq!(fetcher.hits(ROOT), 1);
    }

    #[tokio::test]
    async fn test_already_visited_is_not_fetched() {
        let fetcher = Arc::new(MockFetcher::new().page(ROOT, "<p>hi</p>"));
        let ctx = context(Arc::clone(&fetcher), 1);
        ctx.state.mark_visited(ROOT);

        assert_eq!(
            process_task(&ctx, root_task()).await,
            TaskOutcome::AlreadyVisited
        );
        assert_eq!(fetcher.total_hits(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_url_visited() {
        let fetcher = Arc::new(MockFetcher::new().status(ROOT, 500));
        let ctx = context(Arc::clone(&fetcher), 1);

        assert_eq!(process_task(&ctx, root_task()).await, TaskOutcome::FetchFailed);
        assert!(ctx.state.is_visited(ROOT));
        assert_eq!(ctx.state.product_count(), 0);
        assert!(ctx.frontier.is_empty());
    }

    #[tokio::test]
    async fn test_only_in_scope_links_are_queued() {
        let html = r#"<html><body>
            <a href="/product/1">One</a>
            <a href="/about">About</a>
            <a href="https://www.example.com/blog">Blog</a>
            <a href="https://other.com/product/2">Elsewhere</a>
        </body></html>"#;
        let fetcher = Arc::new(MockFetcher::new().page(ROOT, html));
        let ctx = context(fetcher, 1);

        let outcome = process_task(&ctx, root_task()).await;
        assert_eq!(
            outcome,
            TaskOutcome::Processed {
                product: false,
                links_enqueued: 3
            }
        );

        let mut queued = Vec::new();
        while let Popped::Task(guard) = ctx.frontier.pop(Duration::from_millis(10)).await {
            assert_eq!(guard.task().depth, 1);
            assert_eq!(guard.task().root_domain, "example.com");
            queued.push(guard.task().url.clone());
        }
        assert_eq!(
            queued,
            vec![
                "https://example.com/product/1",
                "https://example.com/about",
                "https://www.example.com/blog",
            ]
        );
    }

    #[tokio::test]
    async fn test_visited_links_are_not_queued() {
        let html = r#"<a href="/">Home</a><a href="/about">About</a>"#;
        let fetcher = Arc::new(MockFetcher::new().page("https://example.com/about", html));
        let ctx = context(fetcher, 2);
        ctx.state.mark_visited(ROOT);

        let task = root_task().child("https://example.com/about");
        let outcome = process_task(&ctx, task).await;

        // Both links point at pages already claimed in the visited set
        assert_eq!(
            outcome,
            TaskOutcome::Processed {
                product: false,
                links_enqueued: 0
            }
        );
        assert!(ctx.frontier.is_empty());
    }

    #[tokio::test]
    async fn test_product_recorded_under_task_root() {
        let url = "https://shop.example.com/item/42";
        let fetcher = Arc::new(MockFetcher::new().page(url, "<p>Blue shirt</p>"));
        let ctx = context(fetcher, 1);

        let outcome = process_task(&ctx, root_task().child(url)).await;
        assert!(outcome.is_product());
        assert!(ctx.state.products_for("example.com").contains(url));
    }

    #[tokio::test]
    async fn test_links_resolved_against_final_url() {
        let fetcher = Arc::new(MockFetcher::new().redirect(
            "https://example.com/old",
            "https://example.com/shop/",
            r#"<a href="shirts">Shirts</a>"#,
        ));
        let ctx = context(fetcher, 1);

        process_task(&ctx, root_task().child("https://example.com/old")).await;

        let popped = ctx.frontier.pop(Duration::from_millis(10)).await;
        match popped {
            Popped::Task(guard) => {
                assert_eq!(guard.task().url, "https://example.com/shop/shirts");
                assert_eq!(guard.task().depth, 2);
            }
            other => panic!("expected queued link, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_worker_survives_panicking_task() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .panic_on("https://example.com/boom")
                .page("https://example.com/fine", "<p>ok</p>"),
        );
        let ctx = Arc::new(context(Arc::clone(&fetcher), 1));
        ctx.frontier.push(root_task().child("https://example.com/boom"));
        ctx.frontier.push(root_task().child("https://example.com/fine"));

        let handled = run_worker(0, Arc::clone(&ctx)).await;

        assert_eq!(handled, 2);
        assert_eq!(ctx.frontier.outstanding(), 0);
        let counters = ctx.state.counters().snapshot();
        assert_eq!(counters.panics, 1);
        assert_eq!(counters.processed, 1);
        assert_eq!(fetcher.hits("https://example.com/fine"), 1);
    }

    #[tokio::test]
    async fn test_worker_exits_when_closed() {
        let fetcher = Arc::new(MockFetcher::new());
        let mut ctx = context(fetcher, 1);
        ctx.idle_timeout = Duration::from_secs(30);
        let ctx = Arc::new(ctx);

        let worker = tokio::spawn(run_worker(0, Arc::clone(&ctx)));
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctx.frontier.close();

        let handled = tokio::time::timeout(Duration::from_secs(5), worker)
            .await
            .expect("closed frontier should stop the worker")
            .unwrap();
        assert_eq!(handled, 0);
    }

    #[tokio::test]
    async fn test_periodic_checkpoint_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        let store = Arc::new(JsonCheckpointStore::new(&path));

        let fetcher = Arc::new(MockFetcher::new().page(ROOT, "<p>hi</p>"));
        let mut ctx = context(fetcher, 1);
        ctx.checkpointer = Arc::new(Checkpointer::new(store.clone(), None, 1));
        let ctx = Arc::new(ctx);
        ctx.frontier.push(root_task());

        run_worker(0, ctx).await;

        let checkpoint = store.load();
        assert!(checkpoint.visited_urls.contains(ROOT));
    }
}
