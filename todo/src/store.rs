//! Persistent store adapter for the task list
//!
//! Wraps a key-value [`Storage`] backend and serializes the full task list
//! as a JSON array under a single key. Writes are full-replace, never
//! incremental.

use eyre::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

use crate::storage::{FileStorage, Storage};
use crate::task::Task;

/// Storage key the serialized task list lives under
pub const STORAGE_KEY: &str = "todo_list";

/// Adapter between the task list and a key-value storage backend
pub struct TaskStore {
    storage: Box<dyn Storage>,
}

impl TaskStore {
    /// Create a store over an existing storage backend
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Convenience: open file-backed storage at the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(FileStorage::open(path)?))
    }

    /// Load the full task list
    ///
    /// Fails soft by policy: an absent key is an empty list, and unreadable
    /// or malformed stored data is logged and treated as empty rather than
    /// propagated. Loading never crashes the caller.
    pub fn load_all(&self) -> Vec<Task> {
        let raw = match self.storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("load_all: no stored list, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "load_all: storage read failed, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(count = tasks.len(), "load_all: loaded task list");
                tasks
            }
            Err(e) => {
                warn!(error = %e, "load_all: stored list is malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Serialize the full list and overwrite the stored value
    pub fn save_all(&self, tasks: &[Task]) -> Result<()> {
        let raw = serde_json::to_string(tasks).context("Failed to serialize task list")?;
        self.storage.write(STORAGE_KEY, &raw).context("Failed to write task list")?;
        debug!(count = tasks.len(), "save_all: wrote task list");
        Ok(())
    }
}
