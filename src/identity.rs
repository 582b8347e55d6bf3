//! Local identity tracker.
//!
//! Remembers which task ids were made on this client and never exist on
//! the remote API, so the store can leave the gateway out of mutations on
//! them. The set is mirrored to the `localTaskIds` slot as a JSON array.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use crate::task::TaskId;

/// Slot holding the local id set.
pub const LOCAL_IDS_KEY: &str = "localTaskIds";

pub struct LocalIds {
    slots: Arc<dyn KeyValueStore>,
    ids: BTreeSet<TaskId>,
}

impl LocalIds {
    /// Load the persisted set; an unreadable or malformed slot starts empty.
    pub fn open(slots: Arc<dyn KeyValueStore>) -> Self {
        let ids = match slots.get(LOCAL_IDS_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<TaskId>>(&raw)
                .map(|ids| ids.into_iter().collect())
                .unwrap_or_else(|e| {
                    warn!(error = %e, "ignoring malformed local id set");
                    BTreeSet::new()
                }),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(error = %e, "could not read local id set");
                BTreeSet::new()
            }
        };
        Self { slots, ids }
    }

    pub fn is_local(&self, id: TaskId) -> bool {
        self.ids.contains(&id)
    }

    /// Idempotent add.
    pub fn mark_local(&mut self, id: TaskId) {
        if self.ids.insert(id) {
            self.persist();
        }
    }

    /// Idempotent remove.
    pub fn unmark_local(&mut self, id: TaskId) {
        if self.ids.remove(&id) {
            self.persist();
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop every id and the slot itself.
    pub fn clear(&mut self) {
        self.ids.clear();
        if let Err(e) = self.slots.remove(LOCAL_IDS_KEY) {
            warn!(error = %e, "could not clear local id set");
        }
    }

    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!(error = %e, "could not persist local id set");
        }
    }

    fn try_persist(&self) -> Result<(), StorageError> {
        let ids: Vec<TaskId> = self.ids.iter().copied().collect();
        self.slots.set(LOCAL_IDS_KEY, &serde_json::to_string(&ids)?)
    }
}
