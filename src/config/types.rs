use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Main configuration structure for Product-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default, rename = "domain")]
    pub domains: Vec<DomainEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link depth followed from a seed (seeds are depth 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of concurrent workers
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: u32,

    /// Seconds a worker waits on an empty frontier before exiting
    #[serde(rename = "idle-timeout-secs", default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Per-request fetch timeout in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Pages fetched between periodic checkpoints (0 disables them)
    #[serde(rename = "checkpoint-interval", default = "default_checkpoint_interval")]
    pub checkpoint_interval: u64,
}

impl CrawlerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_workers: default_max_workers(),
            idle_timeout_secs: default_idle_timeout_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            checkpoint_interval: default_checkpoint_interval(),
        }
    }
}

/// Request headers sent with every fetch
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_referer")]
    pub referer: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            referer: default_referer(),
            accept: default_accept(),
            accept_language: default_accept_language(),
        }
    }
}

/// Checkpoint file location
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointConfig {
    #[serde(default = "default_checkpoint_path")]
    pub path: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: default_checkpoint_path(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of an optional markdown summary written after the crawl
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

/// Overrides for the product classification policy
///
/// Absent lists keep the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierConfig {
    #[serde(rename = "url-patterns")]
    pub url_patterns: Option<Vec<String>>,

    pub keywords: Option<Vec<String>>,
}

/// A seed domain to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    /// Domain name (e.g., "flipkart.com")
    pub name: String,

    /// Entry URL; defaults to `https://{name}`
    pub seed: Option<String>,
}

impl DomainEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: None,
        }
    }

    pub fn with_seed(name: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: Some(seed.into()),
        }
    }

    /// Returns the URL this domain's crawl starts from
    pub fn seed_url(&self) -> Result<Url, url::ParseError> {
        match &self.seed {
            Some(seed) => Url::parse(seed),
            None => crate::url::seed_url(&self.name),
        }
    }
}

fn default_max_depth() -> u32 {
    1
}

fn default_max_workers() -> u32 {
    10
}

fn default_idle_timeout_secs() -> u64 {
    10
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_checkpoint_interval() -> u64 {
    50
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_referer() -> String {
    "https://www.google.com/".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_checkpoint_path() -> String {
    "crawler_progress.json".to_string()
}
