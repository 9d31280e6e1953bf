//! Kanban task data structures.
//!
//! `Task` is a card on the board. `TaskInput` carries the fields of the
//! creation form and `TaskPatch` the fields an edit may change.

use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::fields::*;

/// A card on the kanban board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub assignee: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_by: String,
}

/// Values submitted from the new-task form.
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl TaskInput {
    /// Check the required fields, naming every empty one.
    pub fn validate(&self) -> Result<(), TaskError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.assignee.trim().is_empty() {
            missing.push("assignee");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TaskError::MissingFields(missing))
        }
    }
}

/// Partial update for an existing task. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Patched text fields may not be blanked.
    pub fn validate(&self) -> Result<(), TaskError> {
        let mut missing = Vec::new();
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.title) {
            missing.push("title");
        }
        if blank(&self.description) {
            missing.push("description");
        }
        if blank(&self.assignee) {
            missing.push("assignee");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TaskError::MissingFields(missing))
        }
    }

    /// Merge the present fields into `task`.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(assignee) = self.assignee {
            task.assignee = assignee;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}
