//! Product-Scout: a resumable, domain-scoped product page crawler
//!
//! This crate crawls a fixed set of e-commerce domains breadth-first up to a
//! maximum depth, keeps every crawl inside its seed's registrable domain,
//! classifies each fetched page as a product page or not, and checkpoints its
//! progress so an interrupted crawl can resume where it stopped.

pub mod classifier;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Product-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid value for header {name}: {value:?}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Product-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classifier::{ClassifierPolicy, ProductClassifier, ProductSignal};
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use output::CrawlReport;
pub use state::{CrawlState, CrawlTask, TaskOutcome};
pub use url::{root_domain, root_domain_of};
