//! The task store.
//!
//! [`TaskStore`] owns the in-memory task collection. Mutations are applied
//! optimistically, then confirmed against the gateway; a failed gateway call
//! puts back exactly what was there before. Tasks made on this client and
//! tracked in [`LocalIds`] never reach the gateway.
//!
//! Mutations take `&mut self`, so two of them never interleave. The
//! collection itself sits behind a lock so a [`StoreView`] handed to readers
//! sees the optimistic state while a gateway call is pending.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::TaskCache;
use crate::enhance::Enhancer;
use crate::error::{GatewayError, StoreError};
use crate::gateway::TaskGateway;
use crate::identity::LocalIds;
use crate::storage::KeyValueStore;
use crate::task::{EnhancedTask, TaskId, TaskPatch};

/// Number of tasks fetched on a cold start.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Where a new task comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOrigin {
    /// Built on this client and kept here; the gateway is never told.
    Local,
    /// Created on the remote API after the optimistic insert.
    Remote,
}

/// Where the initial collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColdStart {
    Cache { count: usize },
    Remote { count: usize },
    /// The store was already populated; nothing was read.
    AlreadyLoaded,
}

#[derive(Debug)]
struct StoreState {
    tasks: Vec<EnhancedTask>,
    is_loading: bool,
}

impl StoreState {
    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

/// Read-only handle on the store's collection.
#[derive(Debug, Clone)]
pub struct StoreView {
    state: Arc<RwLock<StoreState>>,
}

impl StoreView {
    pub fn tasks(&self) -> Vec<EnhancedTask> {
        self.state.read().tasks.clone()
    }

    pub fn get(&self, id: TaskId) -> Option<EnhancedTask> {
        let state = self.state.read();
        state.position(id).map(|i| state.tasks[i].clone())
    }

    pub fn len(&self) -> usize {
        self.state.read().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True only while the initial collection is being loaded.
    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }
}

pub struct TaskStore<G> {
    gateway: G,
    cache: TaskCache,
    local: LocalIds,
    enhancer: Enhancer,
    state: Arc<RwLock<StoreState>>,
    page_size: u64,
    loaded: bool,
}

impl<G: TaskGateway> TaskStore<G> {
    /// Build a store over `gateway`, with the cache and the local id set
    /// sharing the `slots` backend. Call [`TaskStore::init`] before use.
    pub fn new(gateway: G, slots: Arc<dyn KeyValueStore>, enhancer: Enhancer) -> Self {
        Self {
            gateway,
            cache: TaskCache::new(slots.clone()),
            local: LocalIds::open(slots),
            enhancer,
            state: Arc::new(RwLock::new(StoreState { tasks: Vec::new(), is_loading: true })),
            page_size: DEFAULT_PAGE_SIZE,
            loaded: false,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn view(&self) -> StoreView {
        StoreView { state: self.state.clone() }
    }

    pub fn tasks(&self) -> Vec<EnhancedTask> {
        self.view().tasks()
    }

    pub fn get(&self, id: TaskId) -> Option<EnhancedTask> {
        self.view().get(id)
    }

    pub fn is_loading(&self) -> bool {
        self.view().is_loading()
    }

    pub fn is_local(&self, id: TaskId) -> bool {
        self.local.is_local(id)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Random source used for drafts built against this store.
    pub fn enhancer(&mut self) -> &mut Enhancer {
        &mut self.enhancer
    }

    /// Cold start: take the cached collection if it has any valid task,
    /// otherwise fetch one page from the gateway, enhance it and seed the
    /// cache. The remote is consulted at most once per store.
    ///
    /// On gateway failure the store stays empty, stops loading, and the
    /// error is returned for the caller to surface.
    pub async fn init(&mut self) -> Result<ColdStart, GatewayError> {
        if self.loaded {
            return Ok(ColdStart::AlreadyLoaded);
        }

        if let Some(tasks) = self.cache.load() {
            let count = tasks.len();
            info!(count, "loaded tasks from cache");
            self.finish_loading(tasks);
            return Ok(ColdStart::Cache { count });
        }

        match self.gateway.list(self.page_size, 0).await {
            Ok(page) => {
                let mut tasks: Vec<EnhancedTask> = Vec::with_capacity(page.items.len());
                for item in page.items {
                    if item.id == 0 || tasks.iter().any(|t| t.id == item.id) {
                        debug!(id = item.id, "skipping unusable remote task");
                        continue;
                    }
                    tasks.push(self.enhancer.enhance(item));
                }
                let count = tasks.len();
                info!(count, total = page.total, "loaded tasks from remote");
                self.cache.save(&tasks);
                self.finish_loading(tasks);
                Ok(ColdStart::Remote { count })
            }
            Err(e) => {
                warn!(error = %e, "initial load failed, starting empty");
                self.finish_loading(Vec::new());
                Err(e)
            }
        }
    }

    /// Insert `task` at the head of the collection.
    ///
    /// `Local` tasks are marked in the identity tracker and kept here.
    /// `Remote` tasks are created on the gateway; on failure the insert is
    /// undone. After a confirmed create the entry takes the server-assigned
    /// id if that id is free; otherwise it keeps its own id and becomes
    /// local, since the remote cannot address it separately.
    ///
    /// Returns the id the task ends up under.
    pub async fn add_task(&mut self, task: EnhancedTask, origin: AddOrigin) -> Result<TaskId, StoreError> {
        let id = task.id;
        if self.state.read().position(id).is_some() {
            return Err(StoreError::DuplicateId(id));
        }
        let input = task.create_input();
        self.state.write().tasks.insert(0, task);
        debug!(id, ?origin, "optimistic add");

        if origin == AddOrigin::Local {
            self.local.mark_local(id);
            self.persist();
            return Ok(id);
        }

        let created = match self.gateway.create(&input).await {
            Ok(created) => created,
            Err(e) => {
                warn!(id, error = %e, "create failed, removing optimistic task");
                self.remove_entry(id);
                return Err(e.into());
            }
        };

        let final_id = self.reconcile_created(id, created.id);
        self.persist();
        Ok(final_id)
    }

    /// Replace the fields `patch` carries on task `id`.
    ///
    /// Local tasks change in place with no gateway call. Remote tasks change
    /// in place, then the gateway is told; on failure the task is put back
    /// exactly as it was.
    pub async fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<(), StoreError> {
        let snapshot = self.get(id).ok_or(StoreError::UnknownTask(id))?;
        {
            let mut state = self.state.write();
            if let Some(i) = state.position(id) {
                patch.apply(&mut state.tasks[i]);
            }
        }

        if self.local.is_local(id) {
            debug!(id, "updated local task");
            self.persist();
            return Ok(());
        }

        match self.gateway.update(id, &patch.update_input()).await {
            Ok(_) => {
                self.persist();
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "update failed, restoring previous task");
                let mut state = self.state.write();
                if let Some(i) = state.position(id) {
                    state.tasks[i] = snapshot;
                }
                Err(e.into())
            }
        }
    }

    /// Remove task `id`.
    ///
    /// Local tasks leave the collection and the identity tracker with no
    /// gateway call. Remote tasks leave the collection first, then the
    /// gateway is told; on failure the task is put back where it was.
    pub async fn delete_task(&mut self, id: TaskId) -> Result<(), StoreError> {
        let (index, removed) = {
            let mut state = self.state.write();
            let index = state.position(id).ok_or(StoreError::UnknownTask(id))?;
            (index, state.tasks.remove(index))
        };

        if self.local.is_local(id) {
            self.local.unmark_local(id);
            debug!(id, "deleted local task");
            self.persist();
            return Ok(());
        }

        let failure = match self.gateway.delete(id).await {
            Ok(receipt) if receipt.deleted => None,
            Ok(_) => Some(StoreError::DeleteRefused(id)),
            Err(e) => Some(e.into()),
        };

        match failure {
            None => {
                self.persist();
                Ok(())
            }
            Some(err) => {
                warn!(id, error = %err, "delete failed, restoring task");
                let mut state = self.state.write();
                let at = index.min(state.tasks.len());
                state.tasks.insert(at, removed);
                Err(err)
            }
        }
    }

    /// Forget the cached collection and the local id set. The next
    /// [`TaskStore::init`] is a cold start against the gateway.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.local.clear();
        let mut state = self.state.write();
        state.tasks.clear();
        state.is_loading = true;
        self.loaded = false;
    }

    fn finish_loading(&mut self, tasks: Vec<EnhancedTask>) {
        let mut state = self.state.write();
        state.tasks = tasks;
        state.is_loading = false;
        self.loaded = true;
    }

    fn reconcile_created(&mut self, client_id: TaskId, server_id: TaskId) -> TaskId {
        if server_id == client_id {
            return client_id;
        }
        let mut state = self.state.write();
        if server_id != 0 && state.position(server_id).is_none() {
            if let Some(i) = state.position(client_id) {
                state.tasks[i].id = server_id;
            }
            debug!(client_id, server_id, "adopted server id");
            return server_id;
        }
        drop(state);
        debug!(client_id, server_id, "server id taken, keeping task local");
        self.local.mark_local(client_id);
        client_id
    }

    fn remove_entry(&self, id: TaskId) {
        self.state.write().tasks.retain(|t| t.id != id);
    }

    fn persist(&self) {
        self.cache.save(&self.state.read().tasks);
    }
}
