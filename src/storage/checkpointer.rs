use crate::state::CrawlState;
use crate::storage::traits::{CheckpointStore, StorageResult};
use crate::storage::Checkpoint;
use std::sync::{Arc, Mutex, PoisonError};

/// Serializes checkpoint writes and decides when periodic saves are due
pub struct Checkpointer {
    store: Arc<dyn CheckpointStore>,
    config_hash: Option<String>,
    interval: u64,
    write_lock: Mutex<()>,
}

impl Checkpointer {
    /// Creates a checkpointer saving every `interval` fetched pages
    ///
    /// An interval of 0 disables periodic saves.
    pub fn new(store: Arc<dyn CheckpointStore>, config_hash: Option<String>, interval: u64) -> Self {
        Self {
            store,
            config_hash,
            interval,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the persisted checkpoint, warning if the configuration changed
    pub fn load(&self) -> Checkpoint {
        let checkpoint = self.store.load();
        if let (Some(previous), Some(current)) = (&checkpoint.config_hash, &self.config_hash) {
            if previous != current {
                tracing::info!(
                    "Configuration changed since checkpoint {} was written",
                    self.store.location()
                );
            }
        }
        checkpoint
    }

    /// Writes a snapshot of the state
    pub fn save(&self, state: &CrawlState) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let checkpoint = Checkpoint::capture(state, self.config_hash.clone());
        self.store.save(&checkpoint)
    }

    /// Whether `fetched` just reached a multiple of the interval
    pub fn is_due(&self, fetched: u64) -> bool {
        self.interval != 0 && fetched != 0 && fetched % self.interval == 0
    }

    /// Saves on the blocking pool when a periodic checkpoint is due
    ///
    /// Failures are logged and otherwise ignored; the crawl goes on.
    pub async fn maybe_save(self: &Arc<Self>, state: &Arc<CrawlState>, fetched: u64) {
        if !self.is_due(fetched) {
            return;
        }

        let checkpointer = Arc::clone(self);
        let state = Arc::clone(state);
        let result = tokio::task::spawn_blocking(move || {
            checkpointer.save(&state).map(|()| state.visited_count())
        })
        .await;

        match result {
            Ok(Ok(visited)) => tracing::info!(
                "Checkpoint saved after {} pages ({} visited URLs)",
                fetched,
                visited
            ),
            Ok(Err(e)) => tracing::warn!("Periodic checkpoint failed: {}", e),
            Err(e) => tracing::warn!("Periodic checkpoint task failed: {}", e),
        }
    }

    pub fn location(&self) -> String {
        self.store.location()
    }
}
