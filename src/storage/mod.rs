//! Storage module for persisting crawl progress
//!
//! This module handles checkpoint persistence, including:
//! - The `Checkpoint` snapshot of visited and product URLs
//! - The `CheckpointStore` backend trait and its JSON file implementation
//! - Serialized, periodic saves during a run via `Checkpointer`

mod checkpoint;
mod checkpointer;
mod json;
mod traits;

pub use checkpoint::Checkpoint;
pub use checkpointer::Checkpointer;
pub use json::JsonCheckpointStore;
pub use traits::{CheckpointStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the JSON checkpoint store at `path`
pub fn open_storage(path: &Path) -> JsonCheckpointStore {
    JsonCheckpointStore::new(path)
}
