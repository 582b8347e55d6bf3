//! Enumerations and field types for the task board.
//!
//! This module defines the structured values used to place and order tasks:
//! board status columns, sort order, status filters and display locales.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Board column a task sits in.
///
/// Serialised with the wire names the dashboard has always stored
/// (`todo`, `inProgress`, `needsReview`, `done`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    #[serde(alias = "TODO")]
    Todo,
    #[serde(alias = "IN_PROGRESS")]
    InProgress,
    #[serde(alias = "NEEDS_REVIEW")]
    NeedsReview,
    #[serde(alias = "DONE")]
    Done,
}

impl Status {
    /// Columns in board order, left to right.
    pub const BOARD: [Status; 4] = [Status::Todo, Status::InProgress, Status::NeedsReview, Status::Done];

    /// Whether moving a task into this column marks it completed.
    pub fn is_completed(self) -> bool {
        self == Status::Done
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::NeedsReview => "Needs Review",
            Status::Done => "Done",
        };
        f.write_str(label)
    }
}

/// Ordering applied to tasks by their end date.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Status filter; `All` keeps every column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }
}

impl From<Option<Status>> for StatusFilter {
    fn from(status: Option<Status>) -> Self {
        status.map_or(StatusFilter::All, StatusFilter::Only)
    }
}

/// Language used for long-form date display.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Fr,
}
