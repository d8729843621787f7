/// A unit of crawl work: fetch `url` at `depth` on behalf of `root_domain`
///
/// Tasks are created when a seed is queued or a link is discovered and are
/// consumed exactly once by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth: u32,
    pub root_domain: String,
}

impl CrawlTask {
    /// Creates a depth-0 task for a seed URL
    pub fn seed(url: impl Into<String>, root_domain: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            root_domain: root_domain.into(),
        }
    }

    /// Creates the task for a link found on this task's page
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: self.depth.saturating_add(1),
            root_domain: self.root_domain.clone(),
        }
    }
}
