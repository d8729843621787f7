//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::storage::Checkpoint;
use thiserror::Error;

/// Errors that can occur while writing a checkpoint
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint backend implementations
///
/// Implementations must be shareable between workers, since periodic
/// checkpoints are written from whichever worker crosses the interval.
pub trait CheckpointStore: Send + Sync {
    /// Loads the last persisted checkpoint
    ///
    /// Never fails: a missing or unreadable checkpoint yields an empty one.
    fn load(&self) -> Checkpoint;

    /// Persists a checkpoint, replacing the previous one
    fn save(&self, checkpoint: &Checkpoint) -> StorageResult<()>;

    /// Human-readable location of the checkpoint, for logs
    fn location(&self) -> String;
}
