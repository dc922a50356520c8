//! Task service request and response shapes
//!
//! These are what [`TaskService`](super::TaskService) accepts and returns.
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Priority, Task, TaskStatus};

/// Request to create a new task
///
/// Enumerations arrive as text so that unknown values surface as validation
/// failures from the task service rather than as body decoding errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title (required, 1-255 characters, not blank)
    pub title: Option<String>,

    /// Task description (optional)
    pub description: Option<String>,

    /// Initial status, defaults to TODO
    pub status: Option<String>,

    /// Priority, defaults to MEDIUM
    pub priority: Option<String>,

    /// Email of the person responsible
    pub assignee_email: Option<String>,

    /// Labels; duplicates collapse
    pub tags: Option<Vec<String>>,

    /// Due date (RFC 3339, year 0000-9999)
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Request with only a title set
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Request to update an existing task
///
/// Absent or `null` fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee_email: Option<String>,
    /// Replaces the whole tag set when present
    pub tags: Option<Vec<String>>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    /// Check if any fields are being updated
    pub fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.status.is_some()
            || self.priority.is_some()
            || self.assignee_email.is_some()
            || self.tags.is_some()
            || self.due_date.is_some()
    }
}

/// Task as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Human-readable status, e.g. "In Progress"
    pub status_display_name: String,
    pub priority: Priority,
    pub assignee_email: Option<String>,
    pub tags: BTreeSet<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            status_display_name: task.status.display_name().to_string(),
            priority: task.priority,
            assignee_email: task.assignee_email,
            tags: task.tags,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Paging, sorting and filter parameters for a task listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListQuery {
    /// Current page (0-indexed, default 0)
    pub page: Option<u32>,

    /// Items per page (default 20, max 100)
    pub size: Option<u32>,

    /// `field` or `field,asc|desc`
    pub sort: Option<String>,

    /// Filter by status (optional)
    pub status: Option<String>,

    /// Filter by priority (optional)
    pub priority: Option<String>,
}

/// Task counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatsResponse {
    pub total: i64,
    /// One entry per status, zero counts included
    pub by_status: BTreeMap<TaskStatus, i64>,
}
