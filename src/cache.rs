//! Durable task cache.
//!
//! Mirrors the full task collection into the `tasks` slot as a JSON array.
//! Nothing here ever fails outward: unreadable or malformed content is a
//! cache miss, and write failures are logged and dropped, so the in-memory
//! store stays authoritative for the session.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{StorageError, ValidationError};
use crate::storage::KeyValueStore;
use crate::task::EnhancedTask;

/// Slot holding the serialised task collection.
pub const TASKS_KEY: &str = "tasks";

#[derive(Clone)]
pub struct TaskCache {
    slots: Arc<dyn KeyValueStore>,
}

impl TaskCache {
    pub fn new(slots: Arc<dyn KeyValueStore>) -> Self {
        Self { slots }
    }

    /// Read the cached collection.
    ///
    /// Returns `None` when the slot is empty, unreadable, not a JSON array,
    /// or holds no valid entry. Invalid entries (wrong shape, id 0, repeated
    /// id) are dropped; if any were dropped the cleaned collection is written
    /// back before returning.
    pub fn load(&self) -> Option<Vec<EnhancedTask>> {
        let raw = match self.slots.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "could not read task cache");
                return None;
            }
        };

        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                let e = ValidationError::Malformed(e.to_string());
                warn!(error = %e, "ignoring task cache");
                return None;
            }
        };

        let total = entries.len();
        let mut seen = HashSet::new();
        let mut valid = Vec::with_capacity(total);
        for entry in entries {
            match validate_entry(entry) {
                Ok(task) if seen.insert(task.id) => valid.push(task),
                Ok(task) => debug!(id = task.id, "dropping repeated cached task"),
                Err(e) => debug!(error = %e, "dropping cached task"),
            }
        }

        if valid.is_empty() {
            return None;
        }
        if valid.len() != total {
            warn!(dropped = total - valid.len(), kept = valid.len(), "task cache had invalid entries, rewriting");
            self.save(&valid);
        }
        Some(valid)
    }

    /// Overwrite the slot with `tasks`. Failures are logged, not returned.
    pub fn save(&self, tasks: &[EnhancedTask]) {
        if let Err(e) = self.try_save(tasks) {
            warn!(error = %e, count = tasks.len(), "could not persist tasks");
        }
    }

    /// Forget the cached collection so the next start is a cold start.
    pub fn clear(&self) {
        if let Err(e) = self.slots.remove(TASKS_KEY) {
            warn!(error = %e, "could not clear task cache");
        }
    }

    fn try_save(&self, tasks: &[EnhancedTask]) -> Result<(), StorageError> {
        let data = serde_json::to_string(tasks)?;
        self.slots.set(TASKS_KEY, &data)
    }
}

fn validate_entry(entry: Value) -> Result<EnhancedTask, ValidationError> {
    let task: EnhancedTask =
        serde_json::from_value(entry).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    if task.id == 0 {
        return Err(ValidationError::NonPositiveId);
    }
    Ok(task)
}
