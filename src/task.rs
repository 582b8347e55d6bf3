//! Task data structures.
//!
//! `Task` is the bare record the remote todo API hands out. `EnhancedTask` is
//! what the store keeps: the remote record plus the board-facing fields
//! (description, date range, counters, checklist, avatars).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::Status;

/// Task identifier. Remote ids are small positive integers; client-built
/// tasks use a millisecond timestamp.
pub type TaskId = u64;

/// A todo record as served by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(rename = "todo")]
    pub title: String,
    pub completed: bool,
    pub user_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Checklist progress shown on a card. `done <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub done: u32,
    pub total: u32,
}

/// A task as held by the store, with its board decoration.
///
/// The decoration is generated once (see [`crate::enhance`]) and carried
/// unchanged afterwards; only [`TaskPatch`] edits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTask {
    pub id: TaskId,
    #[serde(rename = "todo")]
    pub title: String,
    pub completed: bool,
    pub user_id: u64,
    pub status: Status,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub comments: u32,
    pub attachments: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Checklist>,
    pub avatars: Vec<u8>,
}

impl EnhancedTask {
    /// The subset of fields the remote create endpoint accepts.
    pub fn create_input(&self) -> CreateTaskInput {
        CreateTaskInput {
            todo: self.title.clone(),
            completed: self.completed,
            user_id: self.user_id,
        }
    }
}

/// Partial field replacement applied by `TaskStore::update_task`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub status: Option<Status>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Overwrite the fields this patch carries, leaving the rest alone.
    pub fn apply(&self, task: &mut EnhancedTask) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(start) = self.start_date {
            task.start_date = start;
        }
        if let Some(end) = self.end_date {
            task.end_date = end;
        }
    }

    /// The subset of fields the remote update endpoint accepts.
    pub fn update_input(&self) -> UpdateTaskInput {
        UpdateTaskInput {
            todo: self.title.clone(),
            completed: self.completed,
        }
    }
}

/// Body of `POST /todos/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub todo: String,
    pub completed: bool,
    pub user_id: u64,
}

/// Body of `PUT /todos/{id}`; absent fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// One page of `GET /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(rename = "todos")]
    pub items: Vec<Task>,
    pub total: u64,
    #[serde(rename = "skip")]
    pub offset: u64,
    pub limit: u64,
}

/// Outcome of `DELETE /todos/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReceipt {
    pub id: TaskId,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EnhancedTask {
        EnhancedTask {
            id: 7,
            title: "Collect onboarding forms".into(),
            completed: false,
            user_id: 3,
            status: Status::Todo,
            description: "Plan and coordinate upcoming team activities".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 24).unwrap(),
            comments: 4,
            attachments: 2,
            checklist: None,
            avatars: vec![2, 1],
        }
    }

    #[test]
    fn test_enhanced_task_json_layout() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["todo"], "Collect onboarding forms");
        assert_eq!(value["userId"], 3);
        assert_eq!(value["status"], "todo");
        assert_eq!(value["startDate"], "2024-05-10");
        assert!(value.get("checklist").is_none());
    }

    #[test]
    fn test_remote_task_without_status() {
        let task: Task =
            serde_json::from_str(r#"{"id":1,"todo":"A","completed":false,"userId":1}"#).unwrap();
        assert_eq!(task.status, None);
        assert_eq!(task.title, "A");
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut task = sample();
        let patch = TaskPatch {
            title: Some("Renamed".into()),
            status: Some(Status::InProgress),
            ..TaskPatch::default()
        };
        patch.apply(&mut task);
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.description, sample().description);
        assert!(!patch.is_empty());
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn test_update_input_skips_absent_fields() {
        let patch = TaskPatch { completed: Some(true), ..TaskPatch::default() };
        let body = serde_json::to_string(&patch.update_input()).unwrap();
        assert_eq!(body, r#"{"completed":true}"#);
    }

    #[test]
    fn test_create_input_shape() {
        let body = serde_json::to_value(sample().create_input()).unwrap();
        assert_eq!(body, serde_json::json!({"todo": "Collect onboarding forms", "completed": false, "userId": 3}));
    }
}
