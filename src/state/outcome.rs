/// Task outcome definitions and run counters
///
/// Every dequeued task ends in exactly one of these outcomes.
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// How a dequeued task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOutcome {
    // ===== Skip Outcomes =====
    /// Task depth was beyond the configured maximum; nothing was fetched
    DepthExceeded,

    /// URL had already been processed (this run or a previous one)
    AlreadyVisited,

    // ===== Fetched Outcomes =====
    /// Fetch returned a non-200 status or a transport error
    FetchFailed,

    /// Page was fetched, classified and its links followed
    Processed {
        product: bool,
        links_enqueued: usize,
    },
}

impl TaskOutcome {
    /// Returns true if a fetch was attempted for this task
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::Processed { .. })
    }

    /// Returns true if the task was discarded without fetching
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::DepthExceeded | Self::AlreadyVisited)
    }

    /// Returns true if the page was classified as a product
    pub fn is_product(&self) -> bool {
        matches!(self, Self::Processed { product: true, .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DepthExceeded => "depth_exceeded",
            Self::AlreadyVisited => "already_visited",
            Self::FetchFailed => "fetch_failed",
            Self::Processed { .. } => "processed",
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run task counters, shared by all workers
#[derive(Debug, Default)]
pub struct CrawlCounters {
    fetched: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    depth_exceeded: AtomicU64,
    already_visited: AtomicU64,
    products: AtomicU64,
    links_enqueued: AtomicU64,
    panics: AtomicU64,
}

impl CrawlCounters {
    /// Records a task outcome
    ///
    /// Returns the number of pages fetched so far in this run, counting this
    /// one if it was fetched.
    pub fn record(&self, outcome: &TaskOutcome) -> u64 {
        match outcome {
            TaskOutcome::DepthExceeded => {
                self.depth_exceeded.fetch_add(1, Ordering::Relaxed);
            }
            TaskOutcome::AlreadyVisited => {
                self.already_visited.fetch_add(1, Ordering::Relaxed);
            }
            TaskOutcome::FetchFailed => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            TaskOutcome::Processed {
                product,
                links_enqueued,
            } => {
                self.processed.fetch_add(1, Ordering::Relaxed);
                self.links_enqueued
                    .fetch_add(*links_enqueued as u64, Ordering::Relaxed);
                if *product {
                    self.products.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        if outcome.is_fetched() {
            self.fetched.fetch_add(1, Ordering::Relaxed) + 1
        } else {
            self.fetched.load(Ordering::Relaxed)
        }
    }

    /// Records a task whose processing panicked
    pub fn record_panic(&self) {
        self.panics.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            depth_exceeded: self.depth_exceeded.load(Ordering::Relaxed),
            already_visited: self.already_visited.load(Ordering::Relaxed),
            products: self.products.load(Ordering::Relaxed),
            links_enqueued: self.links_enqueued.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CrawlCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Pages fetched (successfully or not)
    pub fetched: u64,
    /// Pages fetched with status 200 and classified
    pub processed: u64,
    /// Fetches that failed
    pub failed: u64,
    pub depth_exceeded: u64,
    pub already_visited: u64,
    /// Product pages found in this run
    pub products: u64,
    pub links_enqueued: u64,
    pub panics: u64,
}
