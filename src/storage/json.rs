//! JSON file checkpoint store
//!
//! This module provides the file-backed implementation of the
//! `CheckpointStore` trait.

use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use crate::storage::Checkpoint;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Checkpoint store backed by a single JSON document
pub struct JsonCheckpointStore {
    path: PathBuf,
}

impl JsonCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the checkpoint is written to before being renamed
    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl CheckpointStore for JsonCheckpointStore {
    fn load(&self) -> Checkpoint {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "No checkpoint at {}, starting with empty state",
                    self.path.display()
                );
                return Checkpoint::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read checkpoint {}: {}; starting with empty state",
                    self.path.display(),
                    e
                );
                return Checkpoint::default();
            }
        };

        match serde_json::from_str::<Checkpoint>(&content) {
            Ok(checkpoint) => {
                tracing::info!(
                    "Loaded checkpoint {}: {} visited URLs, {} product URLs",
                    self.path.display(),
                    checkpoint.visited_urls.len(),
                    checkpoint.product_count()
                );
                checkpoint
            }
            Err(e) => {
                tracing::warn!(
                    "Checkpoint {} is corrupt ({}); starting with empty state",
                    self.path.display(),
                    e
                );
                Checkpoint::default()
            }
        }
    }

    fn save(&self, checkpoint: &Checkpoint) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(checkpoint)?;

        // Write-then-rename so a crash mid-write keeps the previous checkpoint
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| self.io_error(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.io_error(&self.path, e))?;

        tracing::debug!(
            "Saved checkpoint {}: {} visited URLs",
            self.path.display(),
            checkpoint.visited_urls.len()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
