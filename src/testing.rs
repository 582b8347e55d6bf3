//! Recording gateway double for store tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::GatewayError;
use crate::gateway::TaskGateway;
use crate::task::{CreateTaskInput, DeleteReceipt, ListPage, Task, TaskId, UpdateTaskInput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List { limit: u64, offset: u64 },
    Get(TaskId),
    Create(CreateTaskInput),
    Update(TaskId, UpdateTaskInput),
    Delete(TaskId),
}

/// Holds a gateway call open until the test releases it.
#[derive(Default)]
pub(crate) struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    page: Vec<Task>,
    failure: Option<GatewayError>,
    created_id: Option<TaskId>,
    refuse_delete: bool,
    gate: Option<Arc<Gate>>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeGateway {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeGateway {
    pub fn with_page(page: Vec<Task>) -> Self {
        let fake = Self::default();
        fake.inner.lock().page = page;
        fake
    }

    /// Every following call fails with `err`.
    pub fn fail_with(&self, err: GatewayError) {
        self.inner.lock().failure = Some(err);
    }

    pub fn create_returns(&self, id: TaskId) {
        self.inner.lock().created_id = Some(id);
    }

    pub fn refuse_deletes(&self) {
        self.inner.lock().refuse_delete = true;
    }

    pub fn hold_calls(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.inner.lock().gate = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    async fn record(&self, call: Call) -> Result<(), GatewayError> {
        let gate = {
            let mut state = self.inner.lock();
            state.calls.push(call);
            state.gate.clone()
        };
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match self.inner.lock().failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TaskGateway for FakeGateway {
    async fn list(&self, limit: u64, offset: u64) -> Result<ListPage, GatewayError> {
        self.record(Call::List { limit, offset }).await?;
        let page = self.inner.lock().page.clone();
        Ok(ListPage { total: page.len() as u64, items: page, offset, limit })
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Task, GatewayError> {
        self.record(Call::Get(id)).await?;
        let found = self.inner.lock().page.iter().find(|t| t.id == id).cloned();
        found.ok_or(GatewayError::NotFound { id })
    }

    async fn create(&self, draft: &CreateTaskInput) -> Result<Task, GatewayError> {
        self.record(Call::Create(draft.clone())).await?;
        let id = self.inner.lock().created_id.unwrap_or(255);
        Ok(Task {
            id,
            title: draft.todo.clone(),
            completed: draft.completed,
            user_id: draft.user_id,
            status: None,
        })
    }

    async fn update(&self, id: TaskId, fields: &UpdateTaskInput) -> Result<Task, GatewayError> {
        self.record(Call::Update(id, fields.clone())).await?;
        Ok(Task {
            id,
            title: fields.todo.clone().unwrap_or_default(),
            completed: fields.completed.unwrap_or(false),
            user_id: 1,
            status: None,
        })
    }

    async fn delete(&self, id: TaskId) -> Result<DeleteReceipt, GatewayError> {
        self.record(Call::Delete(id)).await?;
        let deleted = !self.inner.lock().refuse_delete;
        Ok(DeleteReceipt { id, deleted })
    }
}
