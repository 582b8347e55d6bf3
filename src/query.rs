//! Filtering, search, sorting and status grouping over a task snapshot.

use crate::fields::{SortOrder, Status, StatusFilter};
use crate::task::EnhancedTask;

/// What the board is currently showing.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// Case-insensitive substring of the title; blank means no search.
    pub search: Option<String>,
    pub status: StatusFilter,
    pub sort: SortOrder,
}

impl TaskQuery {
    pub fn matches(&self, task: &EnhancedTask) -> bool {
        if !self.status.matches(task.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => task.title.to_lowercase().contains(&needle.to_lowercase()),
            _ => true,
        }
    }

    /// Matching tasks ordered by end date. Ties keep collection order.
    pub fn apply<'a>(&self, tasks: &'a [EnhancedTask]) -> Vec<&'a EnhancedTask> {
        let mut out: Vec<&EnhancedTask> = tasks.iter().filter(|t| self.matches(t)).collect();
        match self.sort {
            SortOrder::Newest => out.sort_by(|a, b| b.end_date.cmp(&a.end_date)),
            SortOrder::Oldest => out.sort_by(|a, b| a.end_date.cmp(&b.end_date)),
        }
        out
    }

    /// [`TaskQuery::apply`], split into board columns. Columns excluded by
    /// the status filter are left out; the others appear even when empty.
    pub fn grouped<'a>(&self, tasks: &'a [EnhancedTask]) -> Vec<(Status, Vec<&'a EnhancedTask>)> {
        let matching = self.apply(tasks);
        Status::BOARD
            .iter()
            .filter(|s| self.status.matches(**s))
            .map(|&status| {
                let column = matching.iter().copied().filter(|t| t.status == status).collect();
                (status, column)
            })
            .collect()
    }
}
